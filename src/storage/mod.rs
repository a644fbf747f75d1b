pub mod config;

pub use config::{Config, ConfigError, DayConfig, Direction, HourFormat, LayoutMode};
