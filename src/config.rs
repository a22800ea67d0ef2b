//! Engine and time-window configuration.
//!
//! Load engine settings from TOML to tune scoring and tie-breaking
//! without code changes.
//!
//! # Examples
//!
//! ```
//! use u_timetable::config::{EngineConfig, TieBreak};
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     day_preference_score = 25.0
//!
//!     [tie_break]
//!     type = "jitter"
//!     seed = 42
//! "#).unwrap();
//!
//! assert_eq!(config.day_preference_score, 25.0);
//! assert_eq!(config.teacher_preference_score, 40.0);
//! assert!(matches!(config.tie_break, TieBreak::Jitter { seed: Some(42), .. }));
//! ```

use std::path::Path;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::HourRange;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The global daily teaching window.
///
/// Only whole hours count: the grid runs from `start.hour()` up to but
/// not including `end.hour()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    /// First teaching hour.
    pub start: NaiveTime,
    /// End of the last teaching hour.
    pub end: NaiveTime,
}

impl ScheduleWindow {
    /// Hour used when no global window is configured.
    pub const DEFAULT_START_HOUR: u32 = 7;
    /// End hour used when no global window is configured.
    pub const DEFAULT_END_HOUR: u32 = 22;

    /// Creates a window from two times of day.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Creates a window between two whole hours.
    pub fn hours(start: u32, end: u32) -> Self {
        Self::new(
            crate::models::whole_hour(start),
            crate::models::whole_hour(end),
        )
    }

    /// Whole-hour range of the window.
    pub fn hour_range(&self) -> HourRange {
        HourRange::new(self.start.hour(), self.end.hour())
    }
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        Self::hours(Self::DEFAULT_START_HOUR, Self::DEFAULT_END_HOUR)
    }
}

/// How exact score ties between candidates are resolved.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TieBreak {
    /// First candidate in enumeration order wins: earliest day, then
    /// earliest start hour, then teacher preference order.
    #[default]
    Deterministic,
    /// Adds uniform noise in `[0, magnitude]` to every candidate score.
    Jitter {
        /// Seed for reproducible runs. `None` seeds from the OS.
        #[serde(default)]
        seed: Option<u64>,
        /// Upper bound of the noise.
        #[serde(default = "default_jitter")]
        magnitude: f64,
    },
}

fn default_jitter() -> f64 {
    0.5
}

fn default_day_score() -> f64 {
    20.0
}

fn default_teacher_score() -> f64 {
    40.0
}

/// Scoring and tie-breaking settings for the construction engine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Bonus for placing a block on one of the course's preferred days.
    #[serde(default = "default_day_score")]
    pub day_preference_score: f64,

    /// Bonus for binding a teacher listed in the course's preferences.
    #[serde(default = "default_teacher_score")]
    pub teacher_preference_score: f64,

    /// Tie-break strategy.
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            day_preference_score: default_day_score(),
            teacher_preference_score: default_teacher_score(),
            tie_break: TieBreak::Deterministic,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the tie-break strategy.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Rejects negative scores and jitter magnitudes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.day_preference_score < 0.0 || self.teacher_preference_score < 0.0 {
            return Err(ConfigError::Invalid(
                "preference scores must be non-negative".into(),
            ));
        }
        if let TieBreak::Jitter { magnitude, .. } = self.tie_break {
            if !(0.0..=0.5).contains(&magnitude) {
                return Err(ConfigError::Invalid(format!(
                    "jitter magnitude {magnitude} outside [0, 0.5]"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let w = ScheduleWindow::default();
        assert_eq!(w.hour_range(), HourRange::new(7, 22));
    }

    #[test]
    fn test_window_drops_minutes() {
        let w = ScheduleWindow::new(
            NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(13, 45, 0).unwrap(),
        );
        assert_eq!(w.hour_range(), HourRange::new(7, 13));
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.tie_break, TieBreak::Deterministic);
    }

    #[test]
    fn test_jitter_default_magnitude() {
        let config = EngineConfig::from_toml_str(
            r#"
            [tie_break]
            type = "jitter"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.tie_break,
            TieBreak::Jitter {
                seed: None,
                magnitude: 0.5
            }
        );
    }

    #[test]
    fn test_rejects_large_jitter() {
        let err = EngineConfig::from_toml_str(
            r#"
            [tie_break]
            type = "jitter"
            magnitude = 3.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_negative_score() {
        let err = EngineConfig::from_toml_str("teacher_preference_score = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/engine.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
