//! Core error types for pomowidget-core.
//!
//! This module defines the error hierarchy using thiserror. Most widget
//! failures are recovered locally (audio rejection falls back to a visual
//! cue), so these types mostly surface from configuration and input parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomowidget-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Audio playback errors
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/config directory could not be prepared
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A minutes field did not start with a number
    #[error("Invalid duration '{input}': expected whole minutes")]
    InvalidDuration { input: String },

    /// Value is not one of the offered choices
    #[error("Unknown {field} '{value}'")]
    UnknownChoice { field: String, value: String },

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },
}

/// Audio playback errors reported by an [`AudioOutput`](crate::host::AudioOutput).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Playback was refused by the platform (autoplay policy, no device).
    #[error("Playback rejected: {0}")]
    Rejected(String),

    /// The clip could not be found.
    #[error("Audio clip not found: {0}")]
    MissingClip(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::InvalidValue {
            key: "<file>".into(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_parse_errors_convert_into_core_error() {
        let err = toml::from_str::<crate::Config>("timer = 3").unwrap_err();
        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::Toml(_)));
        assert!(core.to_string().starts_with("TOML error:"));
    }
}
