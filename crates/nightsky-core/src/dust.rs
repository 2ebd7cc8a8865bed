use glam::Vec2;
use nightsky_platform::{Surface, ViewportSize};
use rand::Rng;

use crate::config::DustConfig;
use crate::pool::Entity;
use crate::{random_point, with_alpha, wrap};

/// Slow rising dust mote. Dust is what the pointer links to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dust {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
}

impl Dust {
    pub fn spawn(config: &DustConfig, bounds: ViewportSize, rng: &mut impl Rng) -> Self {
        Self {
            pos: random_point(bounds, rng),
            size: config.size.sample(rng),
            speed: config.speed.sample(rng),
            opacity: config.opacity.sample(rng),
        }
    }
}

impl Entity for Dust {
    type Config = DustConfig;

    fn update(&mut self, _config: &DustConfig, bounds: ViewportSize, rng: &mut impl Rng) {
        self.pos.y -= self.speed;
        if self.pos.y < 0.0 {
            self.pos.y = wrap(self.pos.y, bounds.height);
            self.pos.x = rng.random_range(0.0..bounds.width);
        }
        self.pos.x = wrap(self.pos.x, bounds.width);
    }

    fn draw(&self, config: &DustConfig, surface: &mut dyn Surface) {
        if self.opacity <= 0.0 {
            return;
        }
        surface.fill_circle(self.pos, self.size, with_alpha(config.color, self.opacity));
    }
}
