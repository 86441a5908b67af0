//! Scene configuration (flask.toml)
//!
//! Every field has a default, so an empty file (or no file) yields the stock
//! demonstration timings.

use crate::error::{ConfigError, Result};
use flask_animation::Easing;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub buoyancy: BuoyancyConfig,
    #[serde(default)]
    pub evaporation: EvaporationConfig,
}

/// Step animation timings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BuoyancyConfig {
    /// Length of one step transition
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    /// Pause between auto-play steps once a transition has finished
    #[serde(default = "default_autoplay_dwell_ms")]
    pub autoplay_dwell_ms: u64,
    /// Curve applied to transition progress
    #[serde(default = "default_easing")]
    pub easing: Easing,
}

fn default_transition_ms() -> u64 {
    1200
}

fn default_autoplay_dwell_ms() -> u64 {
    2500
}

fn default_easing() -> Easing {
    Easing::EaseInOutCubic
}

impl Default for BuoyancyConfig {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
            autoplay_dwell_ms: default_autoplay_dwell_ms(),
            easing: default_easing(),
        }
    }
}

/// Evaporation particle timings and geometry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EvaporationConfig {
    /// Liquid particles in the pool
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// One particle is promoted per tick
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Delay from departure to the vapor particle appearing
    #[serde(default = "default_vapor_delay_ms")]
    pub vapor_delay_ms: u64,
    /// Length of the departure visual; the particle is reusable afterwards
    #[serde(default = "default_departure_ms")]
    pub departure_ms: u64,
    /// How long a vapor particle stays fully visible
    #[serde(default = "default_vapor_lifetime_ms")]
    pub vapor_lifetime_ms: u64,
    /// Fade-out before a vapor particle is removed
    #[serde(default = "default_vapor_fade_ms")]
    pub vapor_fade_ms: u64,
    /// Maximum live vapor particles; the oldest is recycled beyond this
    #[serde(default = "default_vapor_capacity")]
    pub vapor_capacity: usize,
    /// Vapor particles seeded when the view mounts
    #[serde(default = "default_ambient_vapors")]
    pub ambient_vapors: usize,
    #[serde(default = "default_ambient_stagger_ms")]
    pub ambient_stagger_ms: u64,
    #[serde(default = "default_ambient_opacity")]
    pub ambient_opacity: f32,
    /// Period of the idle float wobble of liquid particles
    #[serde(default = "default_float_period_ms")]
    pub float_period_ms: u32,
    /// Upper bound of the random per-particle wobble phase delay
    #[serde(default = "default_float_max_delay_ms")]
    pub float_max_delay_ms: u32,
    /// Where liquid particles are placed (x from the left, y from the bottom)
    #[serde(default = "default_liquid_area")]
    pub liquid_area: SpawnArea,
    /// Where vapor particles appear (x from the left, y from the top)
    #[serde(default = "default_vapor_area")]
    pub vapor_area: SpawnArea,
}

fn default_pool_size() -> usize {
    20
}

fn default_tick_ms() -> u64 {
    800
}

fn default_vapor_delay_ms() -> u64 {
    2500
}

fn default_departure_ms() -> u64 {
    3000
}

fn default_vapor_lifetime_ms() -> u64 {
    5000
}

fn default_vapor_fade_ms() -> u64 {
    1000
}

fn default_vapor_capacity() -> usize {
    48
}

fn default_ambient_vapors() -> usize {
    5
}

fn default_ambient_stagger_ms() -> u64 {
    200
}

fn default_ambient_opacity() -> f32 {
    0.3
}

fn default_float_period_ms() -> u32 {
    3000
}

fn default_float_max_delay_ms() -> u32 {
    2000
}

fn default_liquid_area() -> SpawnArea {
    SpawnArea::new(10.0, 20.0, 240.0, 60.0)
}

fn default_vapor_area() -> SpawnArea {
    SpawnArea::new(50.0, 50.0, 400.0, 100.0)
}

impl Default for EvaporationConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            tick_ms: default_tick_ms(),
            vapor_delay_ms: default_vapor_delay_ms(),
            departure_ms: default_departure_ms(),
            vapor_lifetime_ms: default_vapor_lifetime_ms(),
            vapor_fade_ms: default_vapor_fade_ms(),
            vapor_capacity: default_vapor_capacity(),
            ambient_vapors: default_ambient_vapors(),
            ambient_stagger_ms: default_ambient_stagger_ms(),
            ambient_opacity: default_ambient_opacity(),
            float_period_ms: default_float_period_ms(),
            float_max_delay_ms: default_float_max_delay_ms(),
            liquid_area: default_liquid_area(),
            vapor_area: default_vapor_area(),
        }
    }
}

/// Axis-aligned area positions are sampled from
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SpawnArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SpawnArea {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Uniform random point inside the area
    pub fn sample(&self, rng: &mut impl Rng) -> [f32; 2] {
        [
            self.x + rng.gen::<f32>() * self.width,
            self.y + rng.gen::<f32>() * self.height,
        ]
    }

    pub fn contains(&self, point: [f32; 2]) -> bool {
        point[0] >= self.x
            && point[0] <= self.x + self.width
            && point[1] >= self.y
            && point[1] <= self.y + self.height
    }
}

impl SceneConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SceneConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges the schedulers rely on
    pub fn validate(&self) -> Result<()> {
        let evap = &self.evaporation;
        if evap.pool_size == 0 {
            return Err(ConfigError::invalid("evaporation.pool_size", "must be at least 1"));
        }
        if evap.tick_ms == 0 {
            return Err(ConfigError::invalid("evaporation.tick_ms", "must be non-zero"));
        }
        if evap.departure_ms == 0 {
            return Err(ConfigError::invalid("evaporation.departure_ms", "must be non-zero"));
        }
        if evap.vapor_delay_ms > evap.departure_ms {
            return Err(ConfigError::invalid(
                "evaporation.vapor_delay_ms",
                format!(
                    "{} exceeds departure_ms {}",
                    evap.vapor_delay_ms, evap.departure_ms
                ),
            ));
        }
        if evap.vapor_capacity == 0 {
            return Err(ConfigError::invalid("evaporation.vapor_capacity", "must be at least 1"));
        }
        if evap.float_period_ms == 0 {
            return Err(ConfigError::invalid("evaporation.float_period_ms", "must be non-zero"));
        }
        if !(0.0..=1.0).contains(&evap.ambient_opacity) {
            return Err(ConfigError::invalid(
                "evaporation.ambient_opacity",
                format!("{} is outside 0..=1", evap.ambient_opacity),
            ));
        }
        for (field, area) in [
            ("evaporation.liquid_area", evap.liquid_area),
            ("evaporation.vapor_area", evap.vapor_area),
        ] {
            if !(area.width >= 0.0 && area.height >= 0.0) {
                return Err(ConfigError::invalid(field, "width and height must be non-negative"));
            }
        }
        Ok(())
    }
}
