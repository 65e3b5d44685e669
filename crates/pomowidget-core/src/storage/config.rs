//! TOML-based widget configuration.
//!
//! Holds the starting values the widget is built from:
//! - Work and break minutes, tick interval
//! - Alarm sound choice, clip and flash length
//! - Idle quiet period
//! - Slideshow interval and image list
//! - Background music track, color swatches and starting background
//!
//! Configuration is stored at `~/.config/pomowidget/config.toml`. Changes made
//! while the widget runs (field edits, picked colors) are never written back.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::alarm::AlarmSound;
use crate::error::ConfigError;
use crate::widget::WidgetSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    #[serde(default)]
    pub sound: AlarmSound,
    /// Alarm clip played on completion.
    #[serde(default = "default_alarm_clip")]
    pub clip: String,
    #[serde(default = "default_flash_ms")]
    pub flash_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleConfig {
    #[serde(default = "default_quiet_period_secs")]
    pub quiet_period_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideshowConfig {
    #[serde(default = "default_slide_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_images")]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientConfig {
    /// Background music track, looped while playing.
    #[serde(default = "default_music")]
    pub music: String,
    #[serde(default = "default_swatches")]
    pub swatches: Vec<String>,
    /// Background applied at startup; the host's own when unset.
    #[serde(default)]
    pub background: Option<String>,
}

/// Widget configuration.
///
/// Serialized to/from TOML at `~/.config/pomowidget/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub alarm: AlarmConfig,
    #[serde(default)]
    pub idle: IdleConfig,
    #[serde(default)]
    pub slideshow: SlideshowConfig,
    #[serde(default)]
    pub ambient: AmbientConfig,
}

// Default functions
fn default_work_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_alarm_clip() -> String {
    "assets/audio/bell.mp3".into()
}
fn default_flash_ms() -> u64 {
    1200
}
fn default_quiet_period_secs() -> u64 {
    10
}
fn default_slide_interval_secs() -> u64 {
    18
}
fn default_images() -> Vec<String> {
    (1..=7)
        .map(|i| format!("assets/background/bg{i}.jpg"))
        .collect()
}
fn default_music() -> String {
    "assets/audio/background.mp3".into()
}
fn default_swatches() -> Vec<String> {
    [
        "#ffadad", "#ffd6a5", "#fdffb6", "#caffbf", "#9bf6ff", "#a0c4ff", "#bdb2ff", "#ffc6ff",
        "#1e1e2e", "#2e3440", "#f5f5f5", "#000000",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            sound: AlarmSound::default(),
            clip: default_alarm_clip(),
            flash_ms: default_flash_ms(),
        }
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            quiet_period_secs: default_quiet_period_secs(),
        }
    }
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_slide_interval_secs(),
            images: default_images(),
        }
    }
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            music: default_music(),
            swatches: default_swatches(),
            background: None,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, keeping the existing value's type.
    /// Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Starting values for a [`Widget`](crate::Widget).
    pub fn widget_settings(&self) -> WidgetSettings {
        WidgetSettings {
            work_minutes: self.timer.work_minutes.to_string(),
            break_minutes: self.timer.break_minutes.to_string(),
            tick_interval: Duration::from_millis(self.timer.tick_interval_ms),
            alarm_sound: self.alarm.sound,
            alarm_flash: Duration::from_millis(self.alarm.flash_ms),
            quiet_period: Duration::from_secs(self.idle.quiet_period_secs),
            slide_interval: Duration::from_secs(self.slideshow.interval_secs),
            images: self.slideshow.images.clone(),
            swatches: self.ambient.swatches.clone(),
            background: self.ambient.background.clone(),
        }
    }
}
