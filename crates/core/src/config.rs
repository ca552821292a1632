//! World configuration: grid resolution, spawn odds, and the fixed start point.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::MintRule;
use crate::types::{LatLng, MAX_LNG};

/// Oakes College classroom, the original start point.
pub const DEFAULT_START: LatLng = LatLng::new(36.989_493_795_784_01, -122.062_771_285_485_04);
pub const DEFAULT_TILE_WIDTH: f64 = 1e-4;
pub const DEFAULT_VISIBILITY_RADIUS: u32 = 8;
pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.1;
pub const DEFAULT_MIN_COINS: u32 = 1;
pub const DEFAULT_MAX_COINS: u32 = 10;
pub const DEFAULT_TRACKING_INTERVAL_MS: u64 = 1_000;
pub const MAX_VISIBILITY_RADIUS: u32 = 64;
pub const MAX_COINS_PER_CACHE: u32 = 10_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    pub tile_width: f64,
    pub visibility_radius: u32,
    pub spawn_probability: f64,
    pub min_coins: u32,
    pub max_coins: u32,
    pub start: LatLng,
    pub world_seed: u64,
    pub tracking_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            visibility_radius: DEFAULT_VISIBILITY_RADIUS,
            spawn_probability: DEFAULT_SPAWN_PROBABILITY,
            min_coins: DEFAULT_MIN_COINS,
            max_coins: DEFAULT_MAX_COINS,
            start: DEFAULT_START,
            world_seed: 0,
            tracking_interval_ms: DEFAULT_TRACKING_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    TileWidth(f64),
    SpawnProbability(f64),
    CoinRange { min: u32, max: u32 },
    MaxCoins(u32),
    VisibilityRadius(u32),
    StartPoint(LatLng),
    TrackingInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid world config: {message}"),
            Self::TileWidth(width) => write!(
                f,
                "tile_width must be a finite number no smaller than {}, got {width}",
                min_tile_width()
            ),
            Self::SpawnProbability(p) => {
                write!(f, "spawn_probability must lie in [0, 1], got {p}")
            }
            Self::CoinRange { min, max } => {
                write!(f, "min_coins ({min}) must not exceed max_coins ({max})")
            }
            Self::MaxCoins(max) => {
                write!(f, "max_coins must be at most {MAX_COINS_PER_CACHE}, got {max}")
            }
            Self::VisibilityRadius(radius) => write!(
                f,
                "visibility_radius must be at most {MAX_VISIBILITY_RADIUS}, got {radius}"
            ),
            Self::StartPoint(point) => {
                write!(f, "start point must lie on the globe, got ({}, {})", point.lat, point.lng)
            }
            Self::TrackingInterval => write!(f, "tracking_interval_ms must be positive"),
        }
    }
}

impl Error for ConfigError {}

/// Narrowest tile for which every cell index within view of the globe fits in `i32`.
pub fn min_tile_width() -> f64 {
    MAX_LNG / (f64::from(i32::MAX) - f64::from(MAX_VISIBILITY_RADIUS) - 1.0)
}

impl WorldConfig {
    /// Parse a TOML document; omitted keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tile_width.is_finite() || self.tile_width < min_tile_width() {
            return Err(ConfigError::TileWidth(self.tile_width));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(ConfigError::SpawnProbability(self.spawn_probability));
        }
        if self.min_coins > self.max_coins {
            return Err(ConfigError::CoinRange { min: self.min_coins, max: self.max_coins });
        }
        if self.max_coins > MAX_COINS_PER_CACHE {
            return Err(ConfigError::MaxCoins(self.max_coins));
        }
        if self.visibility_radius > MAX_VISIBILITY_RADIUS {
            return Err(ConfigError::VisibilityRadius(self.visibility_radius));
        }
        if !self.start.is_on_globe() {
            return Err(ConfigError::StartPoint(self.start));
        }
        if self.tracking_interval_ms == 0 {
            return Err(ConfigError::TrackingInterval);
        }
        Ok(())
    }

    pub fn mint_rule(&self) -> MintRule {
        MintRule {
            spawn_probability: self.spawn_probability,
            min_coins: self.min_coins,
            max_coins: self.max_coins,
        }
    }
}
