use glam::{Vec2, Vec4};
use nightsky_platform::{Surface, ViewportSize};
use rand::Rng;

use crate::config::ShootingStarConfig;
use crate::pool::Entity;
use crate::with_alpha;

/// Streak across the sky. Ambient ones appear at random; forced ones are
/// requested by the greeting and are longer, faster and wider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShootingStar {
    pub pos: Vec2,
    pub dir: Vec2,
    /// Remaining trail length.
    pub length: f32,
    pub speed: f32,
    pub width: f32,
    pub opacity: f32,
    pub forced: bool,
    pub active: bool,
}

impl ShootingStar {
    pub fn ambient(config: &ShootingStarConfig, bounds: ViewportSize, rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..bounds.width),
                rng.random_range(0.0..bounds.height * 0.6),
            ),
            dir: config.direction,
            length: config.length.sample(rng),
            speed: config.speed.sample(rng),
            width: config.width.sample(rng),
            opacity: 1.0,
            forced: false,
            active: true,
        }
    }

    /// Starts in the upper third, away from the side edges, so the whole
    /// streak is visible.
    pub fn forced(config: &ShootingStarConfig, bounds: ViewportSize, rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(bounds.width * 0.1..bounds.width * 0.9),
                rng.random_range(0.0..bounds.height * 0.3),
            ),
            dir: config.direction,
            length: config.forced_length,
            speed: config.forced_speed,
            width: config.forced_width,
            opacity: 1.0,
            forced: true,
            active: true,
        }
    }

    pub fn tail(&self) -> Vec2 {
        self.pos - self.dir * self.length
    }

    fn out_of_bounds(&self, bounds: ViewportSize) -> bool {
        let margin = self.length.max(0.0);
        self.pos.x < -margin
            || self.pos.x > bounds.width + margin
            || self.pos.y < -margin
            || self.pos.y > bounds.height + margin
    }
}

impl Entity for ShootingStar {
    type Config = ShootingStarConfig;

    fn update(
        &mut self,
        config: &ShootingStarConfig,
        bounds: ViewportSize,
        _rng: &mut impl Rng,
    ) {
        if !self.active {
            return;
        }
        self.pos += self.dir * self.speed;
        self.length -= self.speed * config.length_burn;
        self.opacity -= config.fade;
        if self.length <= 0.0 || self.opacity <= 0.0 || self.out_of_bounds(bounds) {
            self.active = false;
        }
    }

    fn draw(&self, config: &ShootingStarConfig, surface: &mut dyn Surface) {
        if !self.active || self.opacity <= 0.0 {
            return;
        }
        let head = with_alpha(config.color, self.opacity);
        let tail = Vec4::new(head.x, head.y, head.z, 0.0);
        surface.stroke_gradient_line(self.pos, self.tail(), self.width, head, tail);
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
