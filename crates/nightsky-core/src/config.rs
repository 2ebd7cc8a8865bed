//! Engine, greeting, and window configuration with file loading.

use std::path::Path;

use glam::{Vec2, Vec4};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, Result};

/// Half-open sampling range `[min, max)`. A range with `min == max` always
/// yields `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: f32,
    pub max: f32,
}

impl SpawnRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max > self.min {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    pub fn contains(&self, value: f32) -> bool {
        if self.max > self.min {
            value >= self.min && value < self.max
        } else {
            value == self.min
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count: usize,
    /// Parallax depth; scales drift and drawn radius.
    pub depth: SpawnRange,
    pub size: SpawnRange,
    pub base_opacity: SpawnRange,
    /// Opacity change per frame while twinkling.
    pub pulse: SpawnRange,
    pub twinkle_min: f32,
    pub twinkle_max: f32,
    /// Per-frame displacement at depth 1.0.
    pub drift: Vec2,
    pub color: Vec4,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 300,
            depth: SpawnRange::new(0.5, 2.5),
            size: SpawnRange::new(0.5, 2.0),
            base_opacity: SpawnRange::new(0.4, 1.0),
            pulse: SpawnRange::new(0.0, 0.05),
            twinkle_min: 0.3,
            twinkle_max: 1.0,
            drift: Vec2::new(-0.15, 0.0),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DustConfig {
    pub count: usize,
    pub size: SpawnRange,
    /// Upward speed in units per frame.
    pub speed: SpawnRange,
    pub opacity: SpawnRange,
    pub color: Vec4,
}

impl Default for DustConfig {
    fn default() -> Self {
        Self {
            count: 100,
            size: SpawnRange::new(0.5, 2.0),
            speed: SpawnRange::new(0.2, 0.7),
            opacity: SpawnRange::new(0.1, 0.5),
            color: Vec4::new(0.85, 0.9, 1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkleConfig {
    /// Sparkles created per pointer press.
    pub burst: usize,
    pub speed: SpawnRange,
    pub radius: SpawnRange,
    /// Opacity lost per frame.
    pub decay: SpawnRange,
    /// Velocity multiplier applied every frame.
    pub friction: f32,
    pub color: Vec4,
}

impl Default for SparkleConfig {
    fn default() -> Self {
        Self {
            burst: 15,
            speed: SpawnRange::new(1.0, 4.0),
            radius: SpawnRange::new(1.0, 2.5),
            decay: SpawnRange::new(0.015, 0.03),
            friction: 0.95,
            color: Vec4::new(1.0, 0.92, 0.7, 1.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingStarConfig {
    /// Probability of an ambient spawn on any given frame.
    pub spawn_chance: f32,
    pub direction: Vec2,
    pub length: SpawnRange,
    pub speed: SpawnRange,
    pub width: SpawnRange,
    pub forced_length: f32,
    pub forced_speed: f32,
    pub forced_width: f32,
    /// Trail shortening per frame as a fraction of speed.
    pub length_burn: f32,
    /// Opacity lost per frame.
    pub fade: f32,
    pub color: Vec4,
}

impl Default for ShootingStarConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.007,
            direction: Vec2::new(-1.0, 0.5),
            length: SpawnRange::new(100.0, 200.0),
            speed: SpawnRange::new(10.0, 20.0),
            width: SpawnRange::new(0.5, 2.0),
            forced_length: 300.0,
            forced_speed: 25.0,
            forced_width: 3.0,
            length_burn: 0.2,
            fade: 0.015,
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Pointer distance under which a dust particle is linked.
    pub threshold: f32,
    pub width: f32,
    pub color: Vec4,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            threshold: 120.0,
            width: 0.5,
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Optional RNG seed for reproducible skies.
    pub rng_seed: Option<u64>,
    pub stars: StarConfig,
    pub dust: DustConfig,
    pub sparkles: SparkleConfig,
    pub shooting_stars: ShootingStarConfig,
    pub links: LinkConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        let stars = &self.stars;
        if stars.count == 0 {
            return Err(EngineError::InvalidConfig("star count must be non-zero"));
        }
        if !stars.drift.is_finite() {
            return Err(EngineError::InvalidConfig("star drift must be finite"));
        }
        if ![stars.depth, stars.size, stars.base_opacity, stars.pulse]
            .iter()
            .all(SpawnRange::is_valid)
        {
            return Err(EngineError::InvalidConfig("star ranges must be finite with min <= max"));
        }
        if stars.depth.min <= 0.0 || stars.size.min <= 0.0 {
            return Err(EngineError::InvalidConfig("star depth and size must be positive"));
        }
        if !(0.0..=1.0).contains(&stars.twinkle_min)
            || !(0.0..=1.0).contains(&stars.twinkle_max)
            || stars.twinkle_min >= stars.twinkle_max
        {
            return Err(EngineError::InvalidConfig(
                "twinkle band must satisfy 0 <= twinkle_min < twinkle_max <= 1",
            ));
        }

        let dust = &self.dust;
        if dust.count == 0 {
            return Err(EngineError::InvalidConfig("dust count must be non-zero"));
        }
        if ![dust.size, dust.speed, dust.opacity].iter().all(SpawnRange::is_valid) {
            return Err(EngineError::InvalidConfig("dust ranges must be finite with min <= max"));
        }
        if dust.size.min <= 0.0 || dust.opacity.min <= 0.0 || dust.speed.min < 0.0 {
            return Err(EngineError::InvalidConfig(
                "dust size and opacity must be positive, speed non-negative",
            ));
        }

        let sparkles = &self.sparkles;
        if sparkles.burst == 0 {
            return Err(EngineError::InvalidConfig("sparkle burst must be non-zero"));
        }
        if ![sparkles.speed, sparkles.radius, sparkles.decay]
            .iter()
            .all(SpawnRange::is_valid)
        {
            return Err(EngineError::InvalidConfig("sparkle ranges must be finite with min <= max"));
        }
        if sparkles.decay.min <= 0.0 || sparkles.radius.min <= 0.0 {
            return Err(EngineError::InvalidConfig("sparkle decay and radius must be positive"));
        }
        if !(0.0..=1.0).contains(&sparkles.friction) {
            return Err(EngineError::InvalidConfig("sparkle friction must be within [0, 1]"));
        }

        let shooting = &self.shooting_stars;
        if !(0.0..=1.0).contains(&shooting.spawn_chance) {
            return Err(EngineError::InvalidConfig("spawn_chance must be within [0, 1]"));
        }
        if ![shooting.length, shooting.speed, shooting.width]
            .iter()
            .all(SpawnRange::is_valid)
        {
            return Err(EngineError::InvalidConfig(
                "shooting star ranges must be finite with min <= max",
            ));
        }
        if shooting.length.min <= 0.0 || shooting.speed.min <= 0.0 || shooting.width.min <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "shooting star length, speed, and width must be positive",
            ));
        }
        if shooting.forced_length <= 0.0 || shooting.forced_speed <= 0.0 || shooting.forced_width <= 0.0
        {
            return Err(EngineError::InvalidConfig(
                "forced shooting star length, speed, and width must be positive",
            ));
        }
        if shooting.length_burn <= 0.0 || shooting.fade <= 0.0 {
            return Err(EngineError::InvalidConfig("length_burn and fade must be positive"));
        }
        if !shooting.direction.is_finite() || shooting.direction == Vec2::ZERO {
            return Err(EngineError::InvalidConfig("shooting star direction must be non-zero"));
        }

        if !(self.links.threshold > 0.0) || !(self.links.width > 0.0) {
            return Err(EngineError::InvalidConfig("link threshold and width must be positive"));
        }
        Ok(())
    }

    /// Returns the configured RNG, seeding from entropy if no seed is set.
    pub fn seeded_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => {
                let seed: u64 = rand::random();
                SmallRng::seed_from_u64(seed)
            }
        }
    }
}

/// Text and timing of the scripted greeting. Durations are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingConfig {
    pub welcome: String,
    pub enter_label: String,
    pub intro_title: String,
    pub prompt: String,
    /// Message `n` is shown for code `n`, starting at 1.
    pub messages: Vec<String>,
    pub ending_lines: Vec<String>,
    pub signature: String,
    pub overlay_fade: f32,
    pub intro_hold: f32,
    pub intro_fade: f32,
    pub shake: f32,
    pub ending_first_line: f32,
    pub ending_line_interval: f32,
    pub signature_delay: f32,
    pub volley_count: usize,
    pub volley_interval: f32,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            welcome: "Look up.".into(),
            enter_label: "Enter".into(),
            intro_title: "A few words, written in the stars.".into(),
            prompt: "Pick a number from 1 to 10".into(),
            messages: vec![
                "You shine in ways I can't quite explain.".into(),
                "You carry quiet strength, something that feels close to home.".into(),
                "You're the perfect description of a gentleman.".into(),
                "Human sunshine.".into(),
                "You are kinder and gentler than you realize.".into(),
                "Drawing the curtains on another year. Couldn't have asked for better company."
                    .into(),
                "You're a deep thinker. The universe likes that, and so do I.".into(),
                "You're one hell of an amazing human.".into(),
                "Awesome sauce. Officially my favourite human to exist.".into(),
                "You will always be seen and heard.".into(),
            ],
            ending_lines: vec![
                "Happy New Year.".into(),
                "Here's to another great year".into(),
                "filled with unforgettable moments".into(),
                "and memories worth cherishing.".into(),
                " ".into(),
                "May the odds be forever in your favour.".into(),
            ],
            signature: "with love".into(),
            overlay_fade: 1.5,
            intro_hold: 4.0,
            intro_fade: 1.5,
            shake: 0.1,
            ending_first_line: 0.5,
            ending_line_interval: 3.0,
            signature_delay: 1.0,
            volley_count: 5,
            volley_interval: 0.4,
        }
    }
}

impl GreetingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.messages.is_empty() {
            return Err(EngineError::InvalidConfig("at least one message is required"));
        }
        let durations = [
            self.overlay_fade,
            self.intro_hold,
            self.intro_fade,
            self.shake,
            self.ending_first_line,
            self.ending_line_interval,
            self.signature_delay,
            self.volley_interval,
        ];
        if durations.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(EngineError::InvalidConfig("greeting durations must be non-negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    /// Colour the sky is cleared to each frame.
    pub background: Vec4,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Nightsky".into(),
            width: 1280.0,
            height: 800.0,
            background: Vec4::new(0.02, 0.03, 0.08, 1.0),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub greeting: GreetingConfig,
    pub window: WindowConfig,
}

impl AppConfig {
    /// Loads a TOML or JSON config, picked by file extension, and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match extension.as_str() {
            "toml" => Self::from_toml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(EngineError::UnsupportedConfigFormat(other.to_string())),
        };
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.greeting.validate()?;
        if !(self.window.width > 0.0) || !(self.window.height > 0.0) {
            return Err(EngineError::InvalidConfig("window size must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AppConfig::default().validate().expect("defaults validate");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [engine]
            rng_seed = 7

            [engine.stars]
            count = 42

            [engine.links]
            threshold = 80.0
            "#,
        )
        .expect("parses");
        assert_eq!(config.engine.rng_seed, Some(7));
        assert_eq!(config.engine.stars.count, 42);
        assert_eq!(config.engine.dust.count, 100);
        assert_eq!(config.engine.links.threshold, 80.0);
        assert_eq!(config.greeting.messages.len(), 10);
    }

    #[test]
    fn bundled_example_config_parses() {
        let config = AppConfig::from_toml_str(include_str!("../../../nightsky.toml"))
            .expect("example config is valid");
        assert_eq!(config.engine.rng_seed, Some(2026));
        assert_eq!(config.engine.stars.drift, Vec2::new(-0.15, 0.0));
    }

    #[test]
    fn json_config_parses() {
        let config = AppConfig::from_json_str(
            r#"{ "greeting": { "messages": ["only one"] }, "window": { "title": "Sky" } }"#,
        )
        .expect("parses");
        assert_eq!(config.greeting.messages, vec!["only one".to_string()]);
        assert_eq!(config.window.title, "Sky");
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let mut config = EngineConfig::default();
        config.dust.speed = SpawnRange::new(1.0, 0.5);
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn empty_fixed_pools_are_rejected() {
        let mut config = EngineConfig::default();
        config.stars.count = 0;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        let mut config = EngineConfig::default();
        config.dust.count = 0;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        let parsed = AppConfig::from_toml_str("[engine.dust]\ncount = 0\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn non_finite_drift_is_rejected() {
        for drift in [
            Vec2::new(f32::NAN, 0.0),
            Vec2::new(0.0, f32::INFINITY),
            Vec2::new(f32::NEG_INFINITY, 0.0),
        ] {
            let mut config = EngineConfig::default();
            config.stars.drift = drift;
            assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
        }
    }

    #[test]
    fn zero_decay_is_rejected() {
        let mut config = EngineConfig::default();
        config.sparkles.decay = SpawnRange::new(0.0, 0.02);
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = std::env::temp_dir().join("nightsky-config-test.yaml");
        std::fs::write(&dir, "engine: {}").expect("write temp file");
        let err = AppConfig::load(&dir).expect_err("yaml is not supported");
        assert!(matches!(err, EngineError::UnsupportedConfigFormat(ext) if ext == "yaml"));
        let _ = std::fs::remove_file(&dir);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load("/definitely/not/here.toml").expect_err("missing");
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn spawn_range_sampling_stays_inside() {
        let mut rng = SmallRng::seed_from_u64(3);
        let range = SpawnRange::new(2.0, 3.0);
        for _ in 0..1000 {
            assert!(range.contains(range.sample(&mut rng)));
        }
        let fixed = SpawnRange::new(5.0, 5.0);
        assert_eq!(fixed.sample(&mut rng), 5.0);
    }
}
