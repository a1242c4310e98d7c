//! Simulation configuration.
//!
//! Every field has a default, so a JSON document only needs the values it
//! overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::DEFAULT_TOLERANCE;
use crate::controller::{
    Controller, DEFAULT_BASE_SPEED, DEFAULT_SEARCH_TIMEOUT, DEFAULT_TURN_RATE, SteeringWeights,
};
use crate::error::{Result, SimError};
use crate::kinematics::WorldBounds;
use crate::pose::Pose;
use crate::sensor::{DEFAULT_FORWARD_DISTANCE, DEFAULT_LATERAL_OFFSET, SensorArray, SensorGeometry};
use crate::track::{TrackLayout, TrackRaster};

/// Largest accepted raster, in pixels.
pub const MAX_WORLD_PIXELS: u64 = 1 << 24;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// World (and window) width in pixels.
    #[serde(default = "default_world_width")]
    pub world_width: u32,

    /// World (and window) height in pixels.
    #[serde(default = "default_world_height")]
    pub world_height: u32,

    /// Simulation ticks per second.
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,

    /// Forward distance per tick while following.
    #[serde(default = "default_base_speed")]
    pub base_speed: f32,

    /// Degrees per tick for a unit steering error.
    #[serde(default = "default_turn_rate")]
    pub turn_rate: f32,

    /// Search ticks allowed before the run is aborted.
    #[serde(default = "default_search_timeout_ticks")]
    pub search_timeout_ticks: u32,

    /// Per-channel color tolerance for "on line".
    #[serde(default = "default_tolerance")]
    pub tolerance: u8,

    #[serde(default = "default_sensor_forward_distance")]
    pub sensor_forward_distance: f32,

    #[serde(default = "default_sensor_lateral_offset")]
    pub sensor_lateral_offset: f32,

    #[serde(default)]
    pub weights: SteeringWeights,

    #[serde(default)]
    pub track: TrackLayout,

    /// Starting pose, by default centred on the top-left corner of the line.
    #[serde(default)]
    pub start: Pose,
}

fn default_world_width() -> u32 {
    800
}

fn default_world_height() -> u32 {
    600
}

fn default_tick_rate_hz() -> u32 {
    60
}

fn default_base_speed() -> f32 {
    DEFAULT_BASE_SPEED
}

fn default_turn_rate() -> f32 {
    DEFAULT_TURN_RATE
}

fn default_search_timeout_ticks() -> u32 {
    DEFAULT_SEARCH_TIMEOUT
}

fn default_tolerance() -> u8 {
    DEFAULT_TOLERANCE
}

fn default_sensor_forward_distance() -> f32 {
    DEFAULT_FORWARD_DISTANCE
}

fn default_sensor_lateral_offset() -> f32 {
    DEFAULT_LATERAL_OFFSET
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: default_world_width(),
            world_height: default_world_height(),
            tick_rate_hz: default_tick_rate_hz(),
            base_speed: default_base_speed(),
            turn_rate: default_turn_rate(),
            search_timeout_ticks: default_search_timeout_ticks(),
            tolerance: default_tolerance(),
            sensor_forward_distance: default_sensor_forward_distance(),
            sensor_lateral_offset: default_sensor_lateral_offset(),
            weights: SteeringWeights::default(),
            track: TrackLayout::default(),
            start: Pose::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(invalid("world size must be positive"));
        }
        let too_large = i32::try_from(self.world_width).is_err()
            || i32::try_from(self.world_height).is_err()
            || u64::from(self.world_width) * u64::from(self.world_height) > MAX_WORLD_PIXELS;
        if too_large {
            return Err(invalid(format!(
                "world size {}x{} exceeds {MAX_WORLD_PIXELS} pixels",
                self.world_width, self.world_height
            )));
        }
        if self.tick_rate_hz == 0 {
            return Err(invalid("tick rate must be positive"));
        }
        if self.search_timeout_ticks == 0 {
            return Err(invalid("search timeout must be positive"));
        }
        let non_negative = [
            ("base_speed", self.base_speed),
            ("turn_rate", self.turn_rate),
            ("sensor_forward_distance", self.sensor_forward_distance),
            ("sensor_lateral_offset", self.sensor_lateral_offset),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{name} must be finite and >= 0, got {value}")));
            }
        }
        if self.track.thickness <= 0 || self.track.inner_rect().is_empty() {
            return Err(invalid("track thickness must leave a non-empty inner rectangle"));
        }
        if !self.weights.is_valid() {
            return Err(invalid(
                "steering weights must be 0 at center, negative on the left, positive on the \
                 right, with forward sensors outweighing lateral ones",
            ));
        }
        if !self.start.x.is_finite() || !self.start.y.is_finite() {
            return Err(invalid("start position must be finite"));
        }
        Ok(())
    }

    pub fn controller(&self) -> Controller {
        Controller {
            weights: self.weights,
            base_speed: self.base_speed,
            turn_rate: self.turn_rate,
            search_timeout: self.search_timeout_ticks,
        }
    }

    pub fn sensor_array(&self) -> SensorArray {
        SensorArray::new(
            SensorGeometry::new(self.sensor_forward_distance, self.sensor_lateral_offset),
            self.tolerance,
        )
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.world_width as f32, self.world_height as f32)
    }

    pub fn raster(&self) -> TrackRaster {
        TrackRaster::new(
            self.world_width as usize,
            self.world_height as usize,
            self.track,
        )
    }

    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate_hz.max(1) as f32
    }
}

fn invalid(message: impl Into<String>) -> SimError {
    SimError::InvalidConfig(message.into())
}
