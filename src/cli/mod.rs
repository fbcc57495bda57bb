//! CLI command handlers
//!
//! Bridges clap argument parsing with the engine. Handlers write to any
//! `Write` so the binary prints to stdout and tests can capture output.

pub mod config;
pub mod report;

pub use config::{handle_config_command, ConfigCommand};
pub use report::{handle_report_command, ReportCommand};

use chrono::NaiveDateTime;
use serde::Serialize;
use std::io::Write;

use crate::config::Settings;
use crate::display::DisplayOptions;
use crate::error::{FintrackError, FintrackResult};
use crate::export::export_json;
use crate::models::lenient::parse_datetime;
use crate::storage::Snapshot;

/// Everything a report command runs against
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub settings: Settings,
    pub snapshot: Snapshot,
    /// The instant treated as "now"
    pub reference: NaiveDateTime,
    /// Print JSON instead of tables
    pub json: bool,
}

impl CommandContext {
    pub fn new(settings: Settings, snapshot: Snapshot, reference: NaiveDateTime, json: bool) -> Self {
        Self {
            settings,
            snapshot,
            reference,
            json,
        }
    }

    pub fn display(&self) -> DisplayOptions<'_> {
        DisplayOptions::new(&self.settings.currency_symbol, &self.snapshot.categories)
            .with_date_format(&self.settings.date_format)
    }

    /// Print `value` as JSON, or the rendered table
    fn emit<T, F>(&self, value: &T, render: F, out: &mut dyn Write) -> FintrackResult<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&DisplayOptions) -> String,
    {
        if self.json {
            export_json(value, out)
        } else {
            writeln!(out, "{}", render(&self.display()))?;
            Ok(())
        }
    }
}

/// Parse an `--as-of` value: a date (`2025-02-10`) or a timestamp
pub fn parse_reference(value: &str) -> FintrackResult<NaiveDateTime> {
    parse_datetime(value)
        .ok_or_else(|| FintrackError::Validation(format!("Invalid date: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_reference() {
        let parsed = parse_reference("2025-02-10").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
        assert!(parse_reference("2025-02-10T14:30:00Z").is_ok());
        assert!(parse_reference("yesterday").unwrap_err().is_validation());
    }
}
