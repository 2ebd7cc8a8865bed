//! Host abstraction traits so `nightsky-core` stays windowing-agnostic.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};
use tracing::info;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Logical size of the drawable area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A viewport nothing can be placed in: zero, negative, or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Immediate-mode 2D drawing target. Colours are linear RGBA in `[0, 1]`;
/// style travels with every call instead of living in global state.
pub trait Surface {
    fn clear(&mut self, size: ViewportSize);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4);
    /// Line whose colour is interpolated linearly from `from_color` at `from`
    /// to `to_color` at `to`.
    fn stroke_gradient_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        from_color: Vec4,
        to_color: Vec4,
    );
}

/// Host primitive that runs the next animation step on the next display refresh.
pub trait FrameRequester {
    fn request_frame(&self);
}

/// Background music control. The engine only ever asks for play or pause.
pub trait AudioOutput {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn is_paused(&self) -> bool;
}

/// Audio output for hosts without a playback backend; tracks state only.
#[derive(Debug, Default)]
pub struct SilentAudio {
    playing: bool,
}

impl AudioOutput for SilentAudio {
    fn play(&mut self) -> Result<()> {
        info!("audio play (no backend)");
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        info!("audio pause (no backend)");
        self.playing = false;
        Ok(())
    }

    fn is_paused(&self) -> bool {
        !self.playing
    }
}

/// One recorded call against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(ViewportSize),
    Circle {
        center: Vec2,
        radius: f32,
        color: Vec4,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Vec4,
    },
    GradientLine {
        from: Vec2,
        to: Vec2,
        width: f32,
        from_color: Vec4,
        to_color: Vec4,
    },
}

/// Surface that draws nothing and remembers every command, for headless
/// runs and assertions.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn circles(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn lines(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    pub fn gradient_lines(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::GradientLine { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, size: ViewportSize) {
        self.commands.push(DrawCommand::Clear(size));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn stroke_gradient_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        from_color: Vec4,
        to_color: Vec4,
    ) {
        self.commands.push(DrawCommand::GradientLine {
            from,
            to,
            width,
            from_color,
            to_color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_viewports_are_detected() {
        assert!(ViewportSize::new(0.0, 100.0).is_degenerate());
        assert!(ViewportSize::new(100.0, -1.0).is_degenerate());
        assert!(ViewportSize::new(f32::NAN, 100.0).is_degenerate());
        assert!(!ViewportSize::new(800.0, 600.0).is_degenerate());
    }

    #[test]
    fn silent_audio_tracks_state() {
        let mut audio = SilentAudio::default();
        assert!(audio.is_paused());
        audio.play().unwrap();
        assert!(!audio.is_paused());
        audio.pause().unwrap();
        assert!(audio.is_paused());
    }

    #[test]
    fn recording_surface_counts_and_drains_commands() {
        let mut surface = RecordingSurface::new();
        let size = ViewportSize::new(10.0, 10.0);
        surface.clear(size);
        surface.fill_circle(Vec2::ONE, 1.0, Vec4::ONE);
        surface.stroke_line(Vec2::ZERO, Vec2::ONE, 0.5, Vec4::ONE);
        surface.stroke_gradient_line(Vec2::ZERO, Vec2::X, 1.0, Vec4::ONE, Vec4::ZERO);
        assert_eq!(surface.circles(), 1);
        assert_eq!(surface.lines(), 1);
        assert_eq!(surface.gradient_lines(), 1);

        let drained = surface.take();
        assert_eq!(drained.len(), 4);
        assert_eq!(drained[0], DrawCommand::Clear(size));
        assert!(surface.commands.is_empty());
        assert_eq!(surface.gradient_lines(), 0);
    }
}
