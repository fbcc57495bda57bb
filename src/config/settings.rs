//! User settings for fintrack
//!
//! Presentation preferences plus the calendar conventions the engine's
//! window selector needs (week start and fiscal year start).

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::paths::FintrackPaths;
use crate::display::format_date;
use crate::engine::WindowSelector;
use crate::error::FintrackError;
use crate::storage::write_json_atomic;

/// User settings for fintrack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// First day of week (0 = Sunday, 1 = Monday)
    #[serde(default)]
    pub first_day_of_week: u8,

    /// Month the fiscal year starts in (1 = January)
    #[serde(default = "default_fiscal_year_start_month")]
    pub fiscal_year_start_month: u32,

    /// Months shown by trend reports
    #[serde(default = "default_trend_periods")]
    pub trend_periods: usize,

    /// Months projected ahead
    #[serde(default = "default_projection_months")]
    pub projection_months: u32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_fiscal_year_start_month() -> u32 {
    1
}

fn default_trend_periods() -> usize {
    6
}

fn default_projection_months() -> u32 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            first_day_of_week: 0,
            fiscal_year_start_month: default_fiscal_year_start_month(),
            trend_periods: default_trend_periods(),
            projection_months: default_projection_months(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &FintrackPaths) -> Result<Self, FintrackError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            debug!(path = %settings_path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FintrackError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| FintrackError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FintrackPaths) -> Result<(), FintrackError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), FintrackError> {
        if self.first_day_of_week > 6 {
            return Err(FintrackError::Config(format!(
                "first_day_of_week must be 0-6, got {}",
                self.first_day_of_week
            )));
        }

        if !(1..=12).contains(&self.fiscal_year_start_month) {
            return Err(FintrackError::Config(format!(
                "fiscal_year_start_month must be 1-12, got {}",
                self.fiscal_year_start_month
            )));
        }

        // Reports format plain dates, so time and offset fields cannot render
        if format_date(NaiveDate::default(), &self.date_format).is_none() {
            return Err(FintrackError::Config(format!(
                "date_format is not a valid strftime date format: {}",
                self.date_format
            )));
        }

        if self.trend_periods == 0 {
            return Err(FintrackError::Config(
                "trend_periods must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Set one setting from its string form
    ///
    /// Leaves the settings unchanged if the value is rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), FintrackError> {
        let invalid =
            |e: std::num::ParseIntError| FintrackError::Validation(format!("{}: {}", key, e));

        let mut updated = self.clone();
        match key {
            "currency_symbol" => updated.currency_symbol = value.to_string(),
            "date_format" => updated.date_format = value.to_string(),
            "first_day_of_week" => updated.first_day_of_week = value.parse().map_err(invalid)?,
            "fiscal_year_start_month" => {
                updated.fiscal_year_start_month = value.parse().map_err(invalid)?
            }
            "trend_periods" => updated.trend_periods = value.parse().map_err(invalid)?,
            "projection_months" => updated.projection_months = value.parse().map_err(invalid)?,
            _ => return Err(FintrackError::setting_not_found(key)),
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// The configured first day of the week
    pub fn week_start(&self) -> Weekday {
        match self.first_day_of_week % 7 {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }

    /// Window selector using the configured week and fiscal year starts
    pub fn window_selector(&self) -> WindowSelector {
        WindowSelector {
            week_start: self.week_start(),
            fiscal_year_start_month: self.fiscal_year_start_month,
        }
    }
}
