//! eframe host for Nightsky: paints the sky on egui's background layer,
//! forwards pointer input, and lays the greeting screens over it.

use egui::{Color32, RichText};
use glam::{Vec2, Vec4};
use nightsky_core::{
    AnimationEngine, AppConfig, AudioRequest, CodeOutcome, FlowEvent, GreetingFlow, LoopState,
    Stage,
};
use nightsky_platform::{AudioOutput, FrameRequester, Result, SilentAudio, ViewportSize};
use tracing::{debug, error, info, warn};

mod surface;
pub use surface::EguiSurface;

/// Longest step fed to the greeting clock, so a stalled window does not
/// skip straight through timed stages.
const MAX_FRAME_DT: f32 = 0.1;
const SHAKE_OFFSET: f32 = 5.0;
const CODE_ROW_WIDTH: f32 = 200.0;

/// Start the native window and run until it is closed.
pub fn run_app(config: AppConfig) -> Result<()> {
    let app = NightskyApp::new(&config, Box::new(SilentAudio::default()))?;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window.title.clone())
            .with_inner_size([config.window.width, config.window.height]),
        ..Default::default()
    };
    info!(
        width = config.window.width,
        height = config.window.height,
        "opening window"
    );
    eframe::run_native(
        &config.window.title,
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(app))),
    )
    .map_err(|err| format!("window could not be created: {err}").into())
}

/// Repaint requests are egui's "next frame" primitive.
struct RepaintRequester<'a>(&'a egui::Context);

impl FrameRequester for RepaintRequester<'_> {
    fn request_frame(&self) {
        self.0.request_repaint();
    }
}

pub struct NightskyApp {
    engine: AnimationEngine,
    flow: GreetingFlow,
    audio: Box<dyn AudioOutput>,
    background: Vec4,
    code_input: String,
    failed: bool,
}

impl NightskyApp {
    pub fn new(config: &AppConfig, audio: Box<dyn AudioOutput>) -> nightsky_core::Result<Self> {
        Ok(Self {
            engine: AnimationEngine::new(config.engine.clone())?,
            flow: GreetingFlow::new(config.greeting.clone()),
            audio,
            background: config.window.background,
            code_input: String::new(),
            failed: false,
        })
    }

    fn forward_input(&mut self, ctx: &egui::Context, origin: egui::Pos2) {
        let local = |pos: egui::Pos2| Vec2::new(pos.x - origin.x, pos.y - origin.y);
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            match event {
                egui::Event::PointerMoved(pos) => self.engine.pointer_moved(local(pos)),
                egui::Event::PointerButton {
                    pos, pressed: true, ..
                } => self.engine.pointer_pressed(local(pos)),
                egui::Event::PointerGone => self.engine.pointer_left(),
                _ => {}
            }
        }
    }

    fn apply_flow_events(&mut self) {
        for event in self.flow.drain_events() {
            match event {
                FlowEvent::ForcedShootingStar => self.engine.spawn_forced_shooting_star(),
                FlowEvent::Audio(AudioRequest::Play) => {
                    if let Err(err) = self.audio.play() {
                        warn!("audio play failed: {err}");
                        self.flow.set_audio_playing(false);
                    }
                }
                FlowEvent::Audio(AudioRequest::Pause) => {
                    if let Err(err) = self.audio.pause() {
                        warn!("audio pause failed: {err}");
                    }
                }
                other => debug!(event = ?other, "greeting event"),
            }
        }
    }

    fn show_screens(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.3);
                    if let Some(progress) = self.flow.fade_progress() {
                        ui.set_opacity(1.0 - progress);
                    }
                    match self.flow.stage() {
                        Stage::Overlay | Stage::OverlayFading => self.show_overlay(ui),
                        Stage::Intro | Stage::IntroFading => {
                            ui.label(title(&self.flow.config().intro_title, 34.0));
                        }
                        Stage::CodeEntry => self.show_code_entry(ui),
                        Stage::Message(_) => self.show_message(ui),
                        Stage::Ending => self.show_ending(ui),
                    }
                });
            });

        egui::Area::new(egui::Id::new("music-toggle"))
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
            .show(ctx, |ui| {
                let label = if self.flow.audio_playing() {
                    "♪ on"
                } else {
                    "♪ off"
                };
                if ui.button(label).clicked() {
                    self.flow.toggle_audio();
                }
            });
    }

    fn show_overlay(&mut self, ui: &mut egui::Ui) {
        ui.label(title(&self.flow.config().welcome, 40.0));
        ui.add_space(24.0);
        if ui.button(self.flow.config().enter_label.as_str()).clicked() {
            self.flow.enter();
        }
    }

    fn show_code_entry(&mut self, ui: &mut egui::Ui) {
        ui.label(title(&self.flow.config().prompt, 24.0));
        ui.add_space(16.0);

        let offset = if self.flow.is_shaking() { SHAKE_OFFSET } else { 0.0 };
        let codes = self.flow.code_range();
        let hint = format!("{}-{}", codes.start(), codes.end());
        let mut submit = false;
        ui.horizontal(|ui| {
            ui.add_space(((ui.available_width() - CODE_ROW_WIDTH) * 0.5).max(0.0) + offset);
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.code_input)
                    .desired_width(120.0)
                    .hint_text(hint),
            );
            let entered =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Submit").clicked() || entered {
                submit = true;
            }
        });
        if submit {
            if let CodeOutcome::Accepted(code) = self.flow.submit_code(&self.code_input) {
                debug!(code, "showing message");
            }
        }

        if self.flow.finish_available() {
            ui.add_space(24.0);
            if ui.button("Finish").clicked() {
                self.flow.finish();
            }
        }
    }

    fn show_message(&mut self, ui: &mut egui::Ui) {
        if let Some(message) = self.flow.current_message() {
            ui.label(title(message, 28.0));
        }
        ui.add_space(24.0);
        if ui.button("Next").clicked() {
            self.code_input.clear();
            self.flow.next();
        }
    }

    fn show_ending(&mut self, ui: &mut egui::Ui) {
        for line in self.flow.revealed_lines() {
            ui.label(title(line, 26.0));
        }
        if self.flow.signature_revealed() {
            ui.add_space(24.0);
            ui.label(
                RichText::new(self.flow.config().signature.as_str())
                    .italics()
                    .size(22.0)
                    .color(Color32::LIGHT_GRAY),
            );
        }
    }
}

fn title(text: &str, size: f32) -> RichText {
    RichText::new(text).size(size).color(Color32::WHITE)
}

impl eframe::App for NightskyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.failed {
            return;
        }
        let screen = ctx.screen_rect();
        let viewport = ViewportSize::new(screen.width(), screen.height());
        let requester = RepaintRequester(ctx);

        match self.engine.state() {
            LoopState::Idle => {
                if let Err(err) = self.engine.start(viewport, &requester) {
                    error!("cannot start animation: {err}");
                    self.failed = true;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    return;
                }
            }
            LoopState::Running => self.engine.resize(viewport),
        }

        self.forward_input(ctx, screen.min);
        let dt = ctx.input(|i| i.stable_dt).min(MAX_FRAME_DT);
        self.flow.advance(dt);
        self.apply_flow_events();

        let painter = ctx.layer_painter(egui::LayerId::background());
        let mut surface = EguiSurface::new(painter, screen.min, self.background);
        self.engine.step(&mut surface, &requester);

        self.show_screens(ctx);
        self.apply_flow_events();
    }
}
