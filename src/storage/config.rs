use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calendar::{FieldSchema, Resource, ResourceFields};

/// Pixel drift compensation applied to the per-minute rate. Tuned for a
/// one-pixel cell border with rounded-up row heights.
pub const DEFAULT_CALIBRATION: f64 = 1.042;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid day hours: start {start_hour}, end {end_hour}")]
    InvalidHours { start_hour: u32, end_hour: u32 },
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),
}

pub const DEFAULT_DATE_FORMAT: &str = "%A, %B %d, %Y";

/// `None` when `format` is malformed or asks for fields a date lacks.
pub fn format_date(date: NaiveDate, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub day: DayConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub resources: ResourceConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Visible hour range of the day grid. `end_hour` may be 24 (midnight of
/// the next day).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayConfig {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl DayConfig {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, ConfigError> {
        let day = Self { start_hour, end_hour };
        day.validate()?;
        Ok(day)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_hour > 23 || self.end_hour > 24 {
            return Err(ConfigError::InvalidHours {
                start_hour: self.start_hour,
                end_hour: self.end_hour,
            });
        }
        Ok(())
    }
}

impl Default for DayConfig {
    fn default() -> Self {
        Self { start_hour: 9, end_hour: 17 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Greedy single-pass placement in arrival order.
    #[default]
    Legacy,
    /// Lane assignment per overlap cluster.
    Columns,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum HourFormat {
    #[serde(rename = "12")]
    Twelve,
    #[default]
    #[serde(rename = "24")]
    TwentyFour,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    pub height: f64,
    pub direction: Direction,
    pub calibration: f64,
    pub layout_mode: LayoutMode,
    pub hour_format: HourFormat,
    pub date_format: String,
    pub theme: String,
}

impl ViewConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match format_date(NaiveDate::MIN, &self.date_format) {
            Some(_) => Ok(()),
            None => Err(ConfigError::InvalidDateFormat(self.date_format.clone())),
        }
    }

    /// Header text for `date`, using the default format when the configured
    /// one cannot render a date.
    pub fn date_title(&self, date: NaiveDate) -> String {
        format_date(date, &self.date_format).unwrap_or_else(|| {
            tracing::warn!("Date format {:?} cannot render a date, using default", self.date_format);
            date.format(DEFAULT_DATE_FORMAT).to_string()
        })
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            height: 600.0,
            direction: Direction::Ltr,
            calibration: DEFAULT_CALIBRATION,
            layout_mode: LayoutMode::Legacy,
            hour_format: HourFormat::TwentyFour,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            theme: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ResourceConfig {
    #[serde(flatten)]
    pub fields: ResourceFields,
    pub schema: Vec<FieldSchema>,
    pub items: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub discard_stale: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            discard_stale: true,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.day.validate()?;
        config.view.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn load_or_create() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("day-grid")
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            day: DayConfig::default(),
            view: ViewConfig::default(),
            resources: ResourceConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}
