//! Configuration commands

use clap::Subcommand;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{FintrackPaths, Settings};
use crate::error::FintrackResult;
use crate::export::export_json;

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current settings
    Show,

    /// Change one setting
    Set {
        /// Setting name (e.g. currency_symbol, first_day_of_week)
        key: String,
        /// New value
        value: String,
    },

    /// Show where settings and data are stored
    Path,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PathsOutput {
    base_dir: PathBuf,
    settings_file: PathBuf,
    snapshot_file: PathBuf,
}

/// Handle a config command
pub fn handle_config_command(
    paths: &FintrackPaths,
    settings: &Settings,
    cmd: ConfigCommand,
    json: bool,
    out: &mut dyn Write,
) -> FintrackResult<()> {
    match cmd {
        ConfigCommand::Show => {
            if json {
                return export_json(settings, out);
            }
            writeln!(out, "currency_symbol          {}", settings.currency_symbol)?;
            writeln!(out, "date_format              {}", settings.date_format)?;
            writeln!(out, "first_day_of_week        {}", settings.first_day_of_week)?;
            writeln!(out, "fiscal_year_start_month  {}", settings.fiscal_year_start_month)?;
            writeln!(out, "trend_periods            {}", settings.trend_periods)?;
            writeln!(out, "projection_months        {}", settings.projection_months)?;
        }
        ConfigCommand::Set { key, value } => {
            let mut settings = settings.clone();
            settings.set(&key, &value)?;
            settings.save(paths)?;
            writeln!(out, "Set {} = {}", key, value)?;
        }
        ConfigCommand::Path => {
            let output = PathsOutput {
                base_dir: paths.base_dir().to_path_buf(),
                settings_file: paths.settings_file(),
                snapshot_file: paths.snapshot_file(),
            };
            if json {
                return export_json(&output, out);
            }
            writeln!(out, "Base directory: {}", output.base_dir.display())?;
            writeln!(out, "Settings file:  {}", output.settings_file.display())?;
            writeln!(out, "Snapshot file:  {}", output.snapshot_file.display())?;
        }
    }
    Ok(())
}
