use glam::Vec2;
use nightsky_platform::{Surface, ViewportSize};
use rand::Rng;

use crate::config::StarConfig;
use crate::pool::Entity;
use crate::{random_point, with_alpha, wrap};

/// Background star with parallax drift and a twinkle cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    /// Depth in `[0.5, 2.5)` by default; nearer stars drift faster and look bigger.
    pub z: f32,
    pub size: f32,
    pub opacity: f32,
    pub pulse: f32,
    pub pulse_dir: f32,
}

impl Star {
    pub fn spawn(config: &StarConfig, bounds: ViewportSize, rng: &mut impl Rng) -> Self {
        let opacity = config
            .base_opacity
            .sample(rng)
            .clamp(config.twinkle_min, config.twinkle_max);
        Self {
            pos: random_point(bounds, rng),
            z: config.depth.sample(rng),
            size: config.size.sample(rng),
            opacity,
            pulse: config.pulse.sample(rng),
            pulse_dir: 1.0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size * self.z * 0.5
    }
}

impl Entity for Star {
    type Config = StarConfig;

    fn update(&mut self, config: &StarConfig, bounds: ViewportSize, _rng: &mut impl Rng) {
        self.pos += config.drift * self.z;
        self.pos.x = wrap(self.pos.x, bounds.width);
        self.pos.y = wrap(self.pos.y, bounds.height);

        self.opacity += self.pulse * self.pulse_dir;
        if self.opacity >= config.twinkle_max {
            self.opacity = config.twinkle_max;
            self.pulse_dir = -1.0;
        } else if self.opacity <= config.twinkle_min {
            self.opacity = config.twinkle_min;
            self.pulse_dir = 1.0;
        }
    }

    fn draw(&self, config: &StarConfig, surface: &mut dyn Surface) {
        if self.opacity <= 0.0 {
            return;
        }
        surface.fill_circle(self.pos, self.radius(), with_alpha(config.color, self.opacity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn twinkle_stays_inside_band() {
        let config = StarConfig::default();
        let bounds = ViewportSize::new(200.0, 100.0);
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..50 {
            let mut star = Star::spawn(&config, bounds, &mut rng);
            star.pulse = 0.049;
            for _ in 0..500 {
                star.update(&config, bounds, &mut rng);
                assert!(star.opacity >= config.twinkle_min && star.opacity <= config.twinkle_max);
            }
        }
    }

    #[test]
    fn twinkle_reverses_at_band_edges() {
        let config = StarConfig::default();
        let bounds = ViewportSize::new(100.0, 100.0);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut star = Star {
            pos: Vec2::new(50.0, 50.0),
            z: 1.0,
            size: 1.0,
            opacity: 0.98,
            pulse: 0.04,
            pulse_dir: 1.0,
        };
        star.update(&config, bounds, &mut rng);
        assert_eq!(star.opacity, 1.0);
        assert_eq!(star.pulse_dir, -1.0);
        star.update(&config, bounds, &mut rng);
        assert!(star.opacity < 1.0);
    }

    #[test]
    fn deeper_stars_drift_faster() {
        let config = StarConfig::default();
        let bounds = ViewportSize::new(1000.0, 1000.0);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut near = Star {
            pos: Vec2::new(500.0, 500.0),
            z: 2.0,
            size: 1.0,
            opacity: 0.5,
            pulse: 0.0,
            pulse_dir: 1.0,
        };
        let mut far = Star { z: 0.5, ..near };
        near.update(&config, bounds, &mut rng);
        far.update(&config, bounds, &mut rng);
        assert!(500.0 - near.pos.x > 500.0 - far.pos.x);
        assert!(near.radius() > far.radius());
    }

    #[test]
    fn wraps_from_left_edge_to_right() {
        let config = StarConfig::default();
        let bounds = ViewportSize::new(100.0, 100.0);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut star = Star {
            pos: Vec2::new(0.1, 10.0),
            z: 2.0,
            size: 1.0,
            opacity: 0.5,
            pulse: 0.0,
            pulse_dir: 1.0,
        };
        star.update(&config, bounds, &mut rng);
        assert!(star.pos.x > 99.0 && star.pos.x < 100.0);
    }
}
