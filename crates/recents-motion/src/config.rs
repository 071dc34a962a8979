#![forbid(unsafe_code)]

//! Motion tuning as data.
//!
//! Every knob the choreographer reads lives in [`MotionConfig`]. With the
//! `config` feature the struct loads from TOML or JSON; missing keys keep
//! their defaults.
//!
//! ```toml
//! dismiss_stiffness = 800.0
//! dismiss_damping = 0.6
//! additional_neighbor_damping = 0.05
//! ```
//!
//! ```rust,ignore
//! let config = MotionConfig::from_toml_file("motion.toml")?;
//! config.validate()?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use recents_core::spring::{DEFAULT_REST_DISPLACEMENT, DEFAULT_REST_VELOCITY};
use recents_core::{SpringParams, SpringParamsError};

/// Errors from loading or validating a [`MotionConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(feature = "config")]
    #[error("failed to read motion config: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("invalid motion config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config")]
    #[error("invalid motion config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{preset} spring: {source}")]
    Spring {
        preset: &'static str,
        #[source]
        source: SpringParamsError,
    },
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
}

/// Spring presets and thresholds for dismiss, settle and reflow.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct MotionConfig {
    /// Stiffness of dismiss and settle springs.
    pub dismiss_stiffness: f64,
    /// Damping ratio of dismiss and settle springs.
    pub dismiss_damping: f64,
    /// Stiffness of reflow springs.
    pub reflow_stiffness: f64,
    /// Damping ratio of reflow springs.
    pub reflow_damping: f64,
    /// Damping ratio added per unit of neighbour offset.
    pub additional_neighbor_damping: f64,
    /// Floor for the cascade seed velocity when a trigger fires without a
    /// crossing.
    pub min_settle_velocity: f64,
    /// Distance from target below which a spring may rest.
    pub rest_displacement: f64,
    /// Speed below which a spring may rest.
    pub rest_velocity: f64,
    /// Velocity that maps to a full-strength settle haptic.
    pub haptic_full_scale_velocity: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            dismiss_stiffness: 800.0,
            dismiss_damping: 0.6,
            reflow_stiffness: 400.0,
            reflow_damping: 0.85,
            additional_neighbor_damping: 0.05,
            min_settle_velocity: 30.0,
            rest_displacement: DEFAULT_REST_DISPLACEMENT,
            rest_velocity: DEFAULT_REST_VELOCITY,
            haptic_full_scale_velocity: 2_000.0,
        }
    }
}

impl MotionConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize to pretty TOML.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn dismiss_params(&self) -> Result<SpringParams, ConfigError> {
        SpringParams::new(self.dismiss_stiffness, self.dismiss_damping).map_err(|source| {
            ConfigError::Spring {
                preset: "dismiss",
                source,
            }
        })
    }

    pub fn reflow_params(&self) -> Result<SpringParams, ConfigError> {
        SpringParams::new(self.reflow_stiffness, self.reflow_damping).map_err(|source| {
            ConfigError::Spring {
                preset: "reflow",
                source,
            }
        })
    }

    /// Check every field. The first violation is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dismiss_params()?;
        self.reflow_params()?;

        let non_negative = [
            ("additional_neighbor_damping", self.additional_neighbor_damping),
            ("min_settle_velocity", self.min_settle_velocity),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::OutOfRange {
                    field,
                    expected: "finite and non-negative",
                    value,
                });
            }
        }

        let positive = [
            ("rest_displacement", self.rest_displacement),
            ("rest_velocity", self.rest_velocity),
            ("haptic_full_scale_velocity", self.haptic_full_scale_velocity),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::OutOfRange {
                    field,
                    expected: "finite and positive",
                    value,
                });
            }
        }
        Ok(())
    }
}
