//! The animation engine: owns every pool, the viewport, and the pointer, and
//! runs one update+draw pass per host frame.

use glam::Vec2;
use nightsky_platform::{FrameRequester, Surface, ViewportSize};
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::dust::Dust;
use crate::error::{EngineError, Result};
use crate::linker::draw_links;
use crate::pool::Pool;
use crate::shooting_star::ShootingStar;
use crate::sparkle::Sparkle;
use crate::star::Star;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not sized yet; frames are ignored.
    Idle,
    /// Stepping every frame until the host goes away.
    Running,
}

pub struct AnimationEngine {
    config: EngineConfig,
    rng: SmallRng,
    state: LoopState,
    viewport: ViewportSize,
    pointer: Option<Vec2>,
    stars: Pool<Star>,
    dust: Pool<Dust>,
    sparkles: Pool<Sparkle>,
    shooting_stars: Pool<ShootingStar>,
    /// Forced stars requested before the first sizing.
    pending_forced: usize,
    frames: u64,
}

impl AnimationEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let rng = config.seeded_rng();
        Ok(Self {
            config,
            rng,
            state: LoopState::Idle,
            viewport: ViewportSize::new(0.0, 0.0),
            pointer: None,
            stars: Pool::new(),
            dust: Pool::new(),
            sparkles: Pool::new(),
            shooting_stars: Pool::new(),
            pending_forced: 0,
            frames: 0,
        })
    }

    /// Sizes the viewport, seeds the sky, and requests the first frame.
    /// A degenerate viewport means there is nothing to draw on and is fatal.
    pub fn start(&mut self, viewport: ViewportSize, requester: &dyn FrameRequester) -> Result<()> {
        if self.state == LoopState::Running {
            return Err(EngineError::AlreadyRunning);
        }
        if viewport.is_degenerate() {
            return Err(EngineError::SurfaceUnavailable {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = viewport;
        self.reseed();
        self.state = LoopState::Running;
        for _ in 0..std::mem::take(&mut self.pending_forced) {
            self.push_forced_shooting_star();
        }
        info!(
            width = viewport.width,
            height = viewport.height,
            stars = self.stars.len(),
            dust = self.dust.len(),
            forced = self.shooting_stars.len(),
            "animation started"
        );
        requester.request_frame();
        Ok(())
    }

    /// Adopts a new viewport size and reseeds the fixed-density pools.
    pub fn resize(&mut self, viewport: ViewportSize) {
        if viewport.is_degenerate() {
            warn!(
                width = viewport.width,
                height = viewport.height,
                "ignoring degenerate resize"
            );
            return;
        }
        if viewport == self.viewport {
            return;
        }
        info!(
            from_width = self.viewport.width,
            from_height = self.viewport.height,
            width = viewport.width,
            height = viewport.height,
            "viewport resized"
        );
        self.viewport = viewport;
        self.reseed();
    }

    fn reseed(&mut self) {
        let viewport = self.viewport;
        let config = &self.config;
        let rng = &mut self.rng;
        self.stars
            .reseed(config.stars.count, || Star::spawn(&config.stars, viewport, rng));
        self.dust
            .reseed(config.dust.count, || Dust::spawn(&config.dust, viewport, rng));
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    /// Bursts sparkles at `pos`.
    pub fn pointer_pressed(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
        let burst = Sparkle::burst(pos, &self.config.sparkles, &mut self.rng);
        debug!(x = pos.x, y = pos.y, count = burst.len(), "sparkle burst");
        self.sparkles.extend(burst);
    }

    /// Launches one highlighted shooting star for a narrative moment. While
    /// idle there is no viewport to place it in, so it is held back and
    /// launched by `start`.
    pub fn spawn_forced_shooting_star(&mut self) {
        if self.state == LoopState::Idle {
            self.pending_forced += 1;
            debug!(pending = self.pending_forced, "forced shooting star deferred until start");
            return;
        }
        self.push_forced_shooting_star();
    }

    fn push_forced_shooting_star(&mut self) {
        let star = ShootingStar::forced(&self.config.shooting_stars, self.viewport, &mut self.rng);
        debug!(x = star.pos.x, y = star.pos.y, "forced shooting star");
        self.shooting_stars.push(star);
    }

    /// Runs one frame: clear, then update and draw back to front (dust,
    /// links, stars, sparkles, shooting stars), then ask for the next frame.
    /// Returns false while idle.
    pub fn step(&mut self, surface: &mut dyn Surface, requester: &dyn FrameRequester) -> bool {
        if self.state != LoopState::Running {
            debug!("frame before start ignored");
            return false;
        }
        self.frames += 1;
        let viewport = self.viewport;
        surface.clear(viewport);

        self.dust
            .step(&self.config.dust, viewport, &mut self.rng, surface);
        draw_links(
            self.dust.items().iter().map(|d| d.pos),
            self.pointer,
            &self.config.links,
            surface,
        );
        self.stars
            .step(&self.config.stars, viewport, &mut self.rng, surface);
        self.sparkles
            .step(&self.config.sparkles, viewport, &mut self.rng, surface);

        let chance = f64::from(self.config.shooting_stars.spawn_chance);
        if self.rng.random_bool(chance) {
            let star = ShootingStar::ambient(&self.config.shooting_stars, viewport, &mut self.rng);
            self.shooting_stars.push(star);
        }
        self.shooting_stars
            .step(&self.config.shooting_stars, viewport, &mut self.rng, surface);

        requester.request_frame();
        true
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn stars(&self) -> &[Star] {
        self.stars.items()
    }

    pub fn dust(&self) -> &[Dust] {
        self.dust.items()
    }

    pub fn sparkles(&self) -> &[Sparkle] {
        self.sparkles.items()
    }

    pub fn shooting_stars(&self) -> &[ShootingStar] {
        self.shooting_stars.items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nightsky_platform::{DrawCommand, RecordingSurface};
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingRequester(Cell<u32>);

    impl FrameRequester for CountingRequester {
        fn request_frame(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn quiet_config() -> EngineConfig {
        let mut config = EngineConfig {
            rng_seed: Some(99),
            ..EngineConfig::default()
        };
        config.shooting_stars.spawn_chance = 0.0;
        config
    }

    #[test]
    fn idle_engine_ignores_frames() {
        let mut engine = AnimationEngine::new(quiet_config()).unwrap();
        let requester = CountingRequester::default();
        let mut surface = RecordingSurface::new();
        assert!(!engine.step(&mut surface, &requester));
        assert!(surface.commands.is_empty());
        assert_eq!(requester.0.get(), 0);
        assert_eq!(engine.state(), LoopState::Idle);
    }

    #[test]
    fn start_requests_first_frame_and_rejects_restart() {
        let mut engine = AnimationEngine::new(quiet_config()).unwrap();
        let requester = CountingRequester::default();
        engine
            .start(ViewportSize::new(640.0, 480.0), &requester)
            .unwrap();
        assert_eq!(engine.state(), LoopState::Running);
        assert_eq!(requester.0.get(), 1);
        assert!(matches!(
            engine.start(ViewportSize::new(640.0, 480.0), &requester),
            Err(EngineError::AlreadyRunning)
        ));
    }

    #[test]
    fn degenerate_start_is_fatal() {
        let mut engine = AnimationEngine::new(quiet_config()).unwrap();
        let requester = CountingRequester::default();
        let err = engine
            .start(ViewportSize::new(0.0, 480.0), &requester)
            .unwrap_err();
        assert!(matches!(err, EngineError::SurfaceUnavailable { .. }));
        assert_eq!(engine.state(), LoopState::Idle);
    }

    #[test]
    fn frame_draws_in_back_to_front_order() {
        let mut config = quiet_config();
        config.stars.count = 3;
        config.dust.count = 2;
        config.links.threshold = 10_000.0;
        let mut engine = AnimationEngine::new(config).unwrap();
        let requester = CountingRequester::default();
        engine
            .start(ViewportSize::new(400.0, 300.0), &requester)
            .unwrap();
        engine.pointer_moved(Vec2::new(200.0, 150.0));
        engine.pointer_pressed(Vec2::new(10.0, 10.0));
        engine.spawn_forced_shooting_star();

        let mut surface = RecordingSurface::new();
        assert!(engine.step(&mut surface, &requester));
        assert_eq!(requester.0.get(), 2);

        let kinds: Vec<&str> = surface
            .commands
            .iter()
            .map(|c| match c {
                DrawCommand::Clear(_) => "clear",
                DrawCommand::Circle { .. } => "circle",
                DrawCommand::Line { .. } => "link",
                DrawCommand::GradientLine { .. } => "streak",
            })
            .collect();
        assert_eq!(kinds.first(), Some(&"clear"));
        assert_eq!(kinds.last(), Some(&"streak"));
        let first_link = kinds.iter().position(|k| *k == "link").expect("a link");
        // two dust circles come before the links, then 3 stars and 15 sparkles
        assert_eq!(first_link, 3);
        assert_eq!(surface.lines(), 2);
        assert_eq!(surface.circles(), 2 + 3 + 15);
        assert_eq!(surface.gradient_lines(), 1);
    }

    #[test]
    fn forced_star_before_start_launches_inside_the_real_viewport() {
        let mut engine = AnimationEngine::new(quiet_config()).unwrap();
        let requester = CountingRequester::default();
        engine.spawn_forced_shooting_star();
        engine.spawn_forced_shooting_star();
        assert!(engine.shooting_stars().is_empty());

        let viewport = ViewportSize::new(1280.0, 800.0);
        engine.start(viewport, &requester).unwrap();
        let stars = engine.shooting_stars();
        assert_eq!(stars.len(), 2);
        for star in stars {
            assert!(star.forced);
            assert!(star.pos.x >= viewport.width * 0.1 && star.pos.x < viewport.width * 0.9);
            assert!(star.pos.y >= 0.0 && star.pos.y < viewport.height * 0.3);
        }

        let mut surface = RecordingSurface::new();
        assert!(engine.step(&mut surface, &requester));
        assert_eq!(surface.gradient_lines(), 2);
    }

    #[test]
    fn failed_start_keeps_forced_star_pending() {
        let mut engine = AnimationEngine::new(quiet_config()).unwrap();
        let requester = CountingRequester::default();
        engine.spawn_forced_shooting_star();
        assert!(engine.start(ViewportSize::new(0.0, 0.0), &requester).is_err());
        assert!(engine.shooting_stars().is_empty());

        engine
            .start(ViewportSize::new(640.0, 480.0), &requester)
            .unwrap();
        assert_eq!(engine.shooting_stars().len(), 1);
        assert!(engine.shooting_stars()[0].pos.x >= 64.0);
    }

    #[test]
    fn degenerate_resize_keeps_previous_sky() {
        let mut engine = AnimationEngine::new(quiet_config()).unwrap();
        let requester = CountingRequester::default();
        engine
            .start(ViewportSize::new(400.0, 300.0), &requester)
            .unwrap();
        let before = engine.stars().to_vec();
        engine.resize(ViewportSize::new(0.0, 0.0));
        assert_eq!(engine.viewport(), ViewportSize::new(400.0, 300.0));
        assert_eq!(engine.stars(), before.as_slice());
    }

    #[test]
    fn pointer_leaving_clears_links() {
        let mut engine = AnimationEngine::new(quiet_config()).unwrap();
        engine.pointer_moved(Vec2::new(1.0, 2.0));
        assert_eq!(engine.pointer(), Some(Vec2::new(1.0, 2.0)));
        engine.pointer_left();
        assert_eq!(engine.pointer(), None);
    }
}
