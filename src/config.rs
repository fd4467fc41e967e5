//! Engine configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::HashMap;
use std::env::{self, VarError};

use serde::{Deserialize, Serialize};

use crate::consts::{FIT_PADDING_PX, MAX_ZOOM, MIN_ZOOM, PASTE_OFFSET};

pub const ENV_MIN_ZOOM: &str = "CANVAS_MIN_ZOOM";
pub const ENV_MAX_ZOOM: &str = "CANVAS_MAX_ZOOM";
pub const ENV_PASTE_OFFSET: &str = "CANVAS_PASTE_OFFSET";
pub const ENV_FIT_PADDING: &str = "CANVAS_FIT_PADDING";

const ENV_KEYS: [&str; 4] = [ENV_MIN_ZOOM, ENV_MAX_ZOOM, ENV_PASTE_OFFSET, ENV_FIT_PADDING];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but is not a finite number.
    #[error("config parse failed: {key}={value:?} is not a finite number")]
    Parse { key: &'static str, value: String },

    /// A variable is set but is not valid unicode.
    #[error("config parse failed: {key} is not valid unicode: {value:?}")]
    NotUnicode { key: &'static str, value: String },

    /// A field holds NaN or an infinity.
    #[error("{key} must be a finite number, got {value}")]
    NonFinite { key: &'static str, value: f64 },

    /// Zoom bounds are non-positive or inverted.
    #[error("invalid zoom range: min {min} must be positive and not above max {max}")]
    InvalidZoomRange { min: f64, max: f64 },

    /// A length that must not be negative is.
    #[error("{key} must not be negative, got {value}")]
    Negative { key: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// World-space offset applied to pasted copies on both axes.
    pub paste_offset: f64,
    /// Screen-space margin kept by fit-to-content.
    pub fit_padding: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { min_zoom: MIN_ZOOM, max_zoom: MAX_ZOOM, paste_offset: PASTE_OFFSET, fit_padding: FIT_PADDING_PX }
    }
}

impl EngineConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `CANVAS_MIN_ZOOM`: default 0.25
    /// - `CANVAS_MAX_ZOOM`: default 5.0
    /// - `CANVAS_PASTE_OFFSET`: default 20
    /// - `CANVAS_FIT_PADDING`: default 40
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a set variable does not parse or the
    /// resulting values are inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        for key in ENV_KEYS {
            match env::var(key) {
                Ok(value) => {
                    vars.insert(key, value);
                }
                Err(VarError::NotPresent) => {}
                Err(VarError::NotUnicode(raw)) => {
                    return Err(ConfigError::NotUnicode { key, value: raw.to_string_lossy().into_owned() });
                }
            }
        }
        Self::from_vars(|key| vars.get(key).cloned())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`EngineConfig::from_env`].
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            min_zoom: parse_f64(&lookup, ENV_MIN_ZOOM, defaults.min_zoom)?,
            max_zoom: parse_f64(&lookup, ENV_MAX_ZOOM, defaults.max_zoom)?,
            paste_offset: parse_f64(&lookup, ENV_PASTE_OFFSET, defaults.paste_offset)?,
            fit_padding: parse_f64(&lookup, ENV_FIT_PADDING, defaults.fit_padding)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency.
    ///
    /// # Errors
    ///
    /// `NonFinite` when any field is NaN or infinite; `InvalidZoomRange`
    /// when `min_zoom <= 0` or `min_zoom > max_zoom`; `Negative` when the
    /// fit padding is below zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            (ENV_MIN_ZOOM, self.min_zoom),
            (ENV_MAX_ZOOM, self.max_zoom),
            (ENV_PASTE_OFFSET, self.paste_offset),
            (ENV_FIT_PADDING, self.fit_padding),
        ];
        if let Some((key, value)) = fields.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFinite { key, value });
        }
        if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
            return Err(ConfigError::InvalidZoomRange { min: self.min_zoom, max: self.max_zoom });
        }
        if self.fit_padding < 0.0 {
            return Err(ConfigError::Negative { key: ENV_FIT_PADDING, value: self.fit_padding });
        }
        Ok(())
    }
}

fn parse_f64<F>(lookup: &F, key: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConfigError::Parse { key, value: raw }),
    }
}
