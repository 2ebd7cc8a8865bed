use glam::Vec2;
use nightsky_platform::{Surface, ViewportSize};
use rand::Rng;

use crate::config::SparkleConfig;
use crate::pool::Entity;
use crate::with_alpha;

/// Accumulated float error left over after repeated decay steps.
const OPACITY_EPSILON: f32 = 1e-4;

/// Short-lived burst particle spawned where the pointer presses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sparkle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub decay: f32,
}

impl Sparkle {
    pub fn spawn_at(origin: Vec2, config: &SparkleConfig, rng: &mut impl Rng) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        Self {
            pos: origin,
            vel: Vec2::from_angle(angle) * config.speed.sample(rng),
            radius: config.radius.sample(rng),
            opacity: 1.0,
            decay: config.decay.sample(rng),
        }
    }

    pub fn burst(origin: Vec2, config: &SparkleConfig, rng: &mut impl Rng) -> Vec<Sparkle> {
        (0..config.burst)
            .map(|_| Self::spawn_at(origin, config, rng))
            .collect()
    }
}

impl Entity for Sparkle {
    type Config = SparkleConfig;

    fn update(&mut self, config: &SparkleConfig, _bounds: ViewportSize, _rng: &mut impl Rng) {
        self.pos += self.vel;
        self.vel *= config.friction;
        self.opacity -= self.decay;
        if self.opacity < OPACITY_EPSILON {
            self.opacity = 0.0;
        }
    }

    fn draw(&self, config: &SparkleConfig, surface: &mut dyn Surface) {
        if !self.is_active() {
            return;
        }
        surface.fill_circle(self.pos, self.radius, with_alpha(config.color, self.opacity));
    }

    fn is_active(&self) -> bool {
        self.opacity > 0.0
    }
}
