use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::warn;

use fintrack::cli::{
    handle_config_command, handle_report_command, parse_reference, CommandContext, ConfigCommand,
    ReportCommand,
};
use fintrack::config::{FintrackPaths, Settings};
use fintrack::logging::init_tracing;
use fintrack::storage::Snapshot;

#[derive(Parser)]
#[command(
    name = "fintrack",
    author = "Kaylee Beyene",
    version,
    about = "Personal finance calculations from the command line",
    long_about = "fintrack reads a snapshot of transactions, budgets and categories \
                  and reports balances, category breakdowns, budget usage, monthly \
                  trends, statistics, a financial health score and projections."
)]
struct Cli {
    /// Snapshot file (defaults to the snapshot in the data directory)
    #[arg(long, global = true, env = "FINTRACK_DATA")]
    data: Option<PathBuf>,

    /// Date treated as today (YYYY-MM-DD); defaults to the local clock
    #[arg(long, global = true)]
    as_of: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Report(ReportCommand),

    /// Show or change configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let paths = FintrackPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Config(cmd) => {
            handle_config_command(&paths, &settings, cmd, cli.json, &mut out)?;
        }
        Commands::Report(cmd) => {
            let reference = match cli.as_of.as_deref() {
                Some(value) => parse_reference(value)?,
                None => chrono::Local::now().naive_local(),
            };

            let data_path = cli.data.unwrap_or_else(|| paths.snapshot_file());
            let (snapshot, report) = Snapshot::load(&data_path)
                .with_context(|| format!("Failed to load {}", data_path.display()))?;
            if report.skipped > 0 {
                warn!(skipped = report.skipped, "some records could not be read");
            }

            let ctx = CommandContext::new(settings, snapshot, reference, cli.json);
            handle_report_command(&ctx, cmd, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
