//! Configuration types.

use chrono::Datelike;

use crate::error::ConfigError;

/// Wheel picker geometry and year range.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerConfig {
    /// Height of a single row, in layout points.
    pub row_height: f64,
    /// Number of rows visible at once. Must be odd so one row sits in the
    /// selection band.
    pub visible_rows: usize,
    /// First year offered by the year reel.
    pub min_year: i32,
    /// Last year offered by the year reel.
    pub max_year: i32,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            row_height: 44.0,
            visible_rows: 7,
            min_year: 1900,
            max_year: chrono::Local::now().year(),
        }
    }
}

impl PickerConfig {
    /// Blank rows padded before and after the items so the first and last
    /// real items can reach the selection band.
    pub fn spacer_rows(&self) -> usize {
        self.visible_rows / 2
    }

    /// Check the geometry and year range are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "row_height".to_string(),
                message: format!("must be a positive number, got {}", self.row_height),
            });
        }
        if self.visible_rows == 0 || self.visible_rows % 2 == 0 {
            return Err(ConfigError::InvalidValue {
                key: "visible_rows".to_string(),
                message: format!("must be odd and at least 1, got {}", self.visible_rows),
            });
        }
        if self.min_year > self.max_year {
            return Err(ConfigError::InvalidValue {
                key: "min_year".to_string(),
                message: format!("{} is after max_year {}", self.min_year, self.max_year),
            });
        }
        Ok(())
    }
}

/// Onboarding flow configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingConfig {
    /// User the location request is filed for.
    pub user_id: String,
    pub picker: PickerConfig,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            user_id: "default".to_string(),
            picker: PickerConfig::default(),
        }
    }
}

impl OnboardingConfig {
    /// Build a config from defaults overridden by `RALLY_*` environment
    /// variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(user_id) = std::env::var("RALLY_USER_ID") {
            config.user_id = user_id;
        }
        if let Some(h) = parse_env::<f64>("RALLY_PICKER_ROW_HEIGHT")? {
            config.picker.row_height = h;
        }
        if let Some(rows) = parse_env::<usize>("RALLY_PICKER_VISIBLE_ROWS")? {
            config.picker.visible_rows = rows;
        }
        if let Some(year) = parse_env::<i32>("RALLY_PICKER_MIN_YEAR")? {
            config.picker.min_year = year;
        }

        config.picker.validate()?;
        Ok(config)
    }
}

fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
