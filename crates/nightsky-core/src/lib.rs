//! Nightsky core engine: platform-agnostic starfield simulation, pools,
//! pointer constellation links, and the scripted greeting flow.

pub mod config;
pub mod dust;
pub mod engine;
pub mod error;
pub mod greeting;
pub mod linker;
pub mod pool;
pub mod shooting_star;
pub mod sparkle;
pub mod star;

pub use config::{
    AppConfig, DustConfig, EngineConfig, GreetingConfig, LinkConfig, ShootingStarConfig,
    SparkleConfig, SpawnRange, StarConfig, WindowConfig,
};
pub use dust::Dust;
pub use engine::{AnimationEngine, LoopState};
pub use error::{EngineError, Result};
pub use greeting::{AudioRequest, CodeOutcome, FlowEvent, GreetingFlow, MAX_CODE, Stage};
pub use linker::{draw_links, link_opacity};
pub use pool::{Entity, Pool};
pub use shooting_star::ShootingStar;
pub use sparkle::Sparkle;
pub use star::Star;

use glam::{Vec2, Vec4};
use nightsky_platform::ViewportSize;
use rand::Rng;

/// Wraps `value` into `[0, max)`.
pub(crate) fn wrap(value: f32, max: f32) -> f32 {
    let wrapped = value.rem_euclid(max);
    // rem_euclid may round up to exactly `max` for tiny negative inputs
    if wrapped >= max {
        0.0
    } else {
        wrapped
    }
}

pub(crate) fn with_alpha(color: Vec4, alpha: f32) -> Vec4 {
    Vec4::new(color.x, color.y, color.z, color.w * alpha.clamp(0.0, 1.0))
}

pub(crate) fn random_point(bounds: ViewportSize, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.random_range(0.0..bounds.width),
        rng.random_range(0.0..bounds.height),
    )
}
