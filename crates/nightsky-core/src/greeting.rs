//! Scripted greeting: overlay, intro, code entry, message, ending.
//!
//! The flow never reads a clock. The host passes elapsed seconds to
//! [`GreetingFlow::advance`] and drains the resulting [`FlowEvent`]s, so a
//! whole run can be replayed deterministically.

use std::ops::RangeInclusive;

use tracing::{debug, info};

use crate::config::GreetingConfig;

/// Highest code the prompt accepts, however long the message table is.
pub const MAX_CODE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Waiting for the visitor to enter.
    Overlay,
    OverlayFading,
    Intro,
    IntroFading,
    CodeEntry,
    /// Showing the message for this code.
    Message(u32),
    Ending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioRequest {
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    StageChanged(Stage),
    ForcedShootingStar,
    CodeRejected,
    LineRevealed(usize),
    SignatureRevealed,
    Audio(AudioRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeOutcome {
    Accepted(u32),
    Rejected,
    /// Codes are only read while the prompt is showing.
    Ignored,
}

#[derive(Debug)]
pub struct GreetingFlow {
    config: GreetingConfig,
    stage: Stage,
    /// Seconds spent in the current stage.
    elapsed: f32,
    finish_available: bool,
    audio_playing: bool,
    shake_remaining: f32,
    lines_revealed: usize,
    signature_revealed: bool,
    volley_fired: usize,
    events: Vec<FlowEvent>,
}

impl GreetingFlow {
    pub fn new(config: GreetingConfig) -> Self {
        Self {
            config,
            stage: Stage::Overlay,
            elapsed: 0.0,
            finish_available: false,
            audio_playing: false,
            shake_remaining: 0.0,
            lines_revealed: 0,
            signature_revealed: false,
            volley_fired: 0,
            events: Vec::new(),
        }
    }

    /// Leaves the overlay and starts the music.
    pub fn enter(&mut self) {
        if self.stage != Stage::Overlay {
            return;
        }
        self.audio_playing = true;
        self.events.push(FlowEvent::Audio(AudioRequest::Play));
        self.set_stage(Stage::OverlayFading);
    }

    pub fn toggle_audio(&mut self) {
        self.audio_playing = !self.audio_playing;
        let request = if self.audio_playing {
            AudioRequest::Play
        } else {
            AudioRequest::Pause
        };
        self.events.push(FlowEvent::Audio(request));
    }

    /// Corrects the flow's idea of the music state, e.g. after playback failed.
    pub fn set_audio_playing(&mut self, playing: bool) {
        self.audio_playing = playing;
    }

    pub fn submit_code(&mut self, text: &str) -> CodeOutcome {
        if self.stage != Stage::CodeEntry {
            return CodeOutcome::Ignored;
        }
        match parse_code(text).filter(|code| self.code_range().contains(code)) {
            Some(code) => {
                info!(code, "code accepted");
                self.events.push(FlowEvent::ForcedShootingStar);
                self.set_stage(Stage::Message(code));
                CodeOutcome::Accepted(code)
            }
            None => {
                debug!(input = text, "code rejected");
                self.shake_remaining = self.config.shake;
                self.events.push(FlowEvent::CodeRejected);
                CodeOutcome::Rejected
            }
        }
    }

    /// Back from a message to the prompt; from now on the visitor may finish.
    pub fn next(&mut self) {
        if let Stage::Message(_) = self.stage {
            self.finish_available = true;
            self.set_stage(Stage::CodeEntry);
        }
    }

    pub fn finish(&mut self) {
        if self.stage == Stage::CodeEntry && self.finish_available {
            self.lines_revealed = 0;
            self.signature_revealed = false;
            self.volley_fired = 0;
            self.set_stage(Stage::Ending);
        }
    }

    /// Moves the clock forward by `dt` seconds, queueing whatever became due.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.shake_remaining = (self.shake_remaining - dt).max(0.0);

        loop {
            let (limit, next) = match self.stage {
                Stage::OverlayFading => (self.config.overlay_fade, Stage::Intro),
                Stage::Intro => (self.config.intro_hold, Stage::IntroFading),
                Stage::IntroFading => (self.config.intro_fade, Stage::CodeEntry),
                _ => break,
            };
            if self.elapsed < limit {
                break;
            }
            let carry = self.elapsed - limit;
            self.set_stage(next);
            self.elapsed = carry;
        }

        if self.stage == Stage::Ending {
            self.advance_ending();
        }
    }

    fn advance_ending(&mut self) {
        let cfg = &self.config;
        while self.lines_revealed < cfg.ending_lines.len()
            && self.elapsed
                >= cfg.ending_first_line + self.lines_revealed as f32 * cfg.ending_line_interval
        {
            self.events.push(FlowEvent::LineRevealed(self.lines_revealed));
            self.lines_revealed += 1;
        }

        let signature_at = self.signature_at();
        if !self.signature_revealed && self.elapsed >= signature_at {
            self.signature_revealed = true;
            self.events.push(FlowEvent::SignatureRevealed);
        }
        if !self.signature_revealed {
            return;
        }
        while self.volley_fired < cfg.volley_count
            && self.elapsed >= signature_at + self.volley_fired as f32 * cfg.volley_interval
        {
            self.events.push(FlowEvent::ForcedShootingStar);
            self.volley_fired += 1;
        }
    }

    /// Seconds into the ending at which the signature appears: one line
    /// interval per line slot after the first line, plus the signature delay.
    fn signature_at(&self) -> f32 {
        let cfg = &self.config;
        cfg.ending_first_line
            + cfg.ending_lines.len() as f32 * cfg.ending_line_interval
            + cfg.signature_delay
    }

    fn set_stage(&mut self, stage: Stage) {
        info!(from = ?self.stage, to = ?stage, "greeting stage");
        self.stage = stage;
        self.elapsed = 0.0;
        self.events.push(FlowEvent::StageChanged(stage));
    }

    pub fn drain_events(&mut self) -> Vec<FlowEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Seconds spent in the current stage.
    pub fn stage_elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Fraction in `[0, 1]` of the current fade, or `None` outside fades.
    pub fn fade_progress(&self) -> Option<f32> {
        let duration = match self.stage {
            Stage::OverlayFading => self.config.overlay_fade,
            Stage::IntroFading => self.config.intro_fade,
            _ => return None,
        };
        if duration <= 0.0 {
            return Some(1.0);
        }
        Some((self.elapsed / duration).clamp(0.0, 1.0))
    }

    /// Codes that currently open a message: `1..=10`, narrowed to the table.
    pub fn code_range(&self) -> RangeInclusive<u32> {
        let known = u32::try_from(self.config.messages.len()).unwrap_or(u32::MAX);
        1..=known.min(MAX_CODE)
    }

    pub fn message(&self, code: u32) -> Option<&str> {
        let index = usize::try_from(code).ok()?.checked_sub(1)?;
        self.config.messages.get(index).map(String::as_str)
    }

    pub fn current_message(&self) -> Option<&str> {
        match self.stage {
            Stage::Message(code) => self.message(code),
            _ => None,
        }
    }

    pub fn revealed_lines(&self) -> &[String] {
        &self.config.ending_lines[..self.lines_revealed]
    }

    pub fn signature_revealed(&self) -> bool {
        self.signature_revealed
    }

    pub fn finish_available(&self) -> bool {
        self.finish_available
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_remaining > 0.0
    }

    pub fn audio_playing(&self) -> bool {
        self.audio_playing
    }

    pub fn config(&self) -> &GreetingConfig {
        &self.config
    }
}

/// Reads the leading decimal digits, ignoring surrounding whitespace and
/// anything after the number.
fn parse_code(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
