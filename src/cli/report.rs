//! Report commands
//!
//! Each command derives one structure from the loaded snapshot and prints
//! it as a table, as JSON, or (where supported) writes it to a CSV file.

use clap::Subcommand;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::CommandContext;
use crate::display::{
    render_balance, render_breakdown, render_budgets, render_category_trends, render_dashboard,
    render_health, render_projection, render_statistics, render_trends,
};
use crate::engine::{
    calculate_all_budget_progress, calculate_balance, calculate_category_trends,
    calculate_money_statistics, calculate_projections, calculate_spending_by_category,
    calculate_statistics, calculate_trends, calculate_windowed_health_score, summarize_trends,
    top_categories, BudgetOverview, BudgetProgress, CategoryTrend, DateRange, StatisticsResult,
    TimeWindow, TrendPoint, TrendSummary,
};
use crate::error::FintrackResult;
use crate::export::{export_breakdown_csv, export_budget_progress_csv, export_trends_csv};
use crate::models::{Transaction, TransactionType};
use crate::reports::{DashboardOptions, DashboardReport};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Show income, expenses and balance
    Balance {
        /// Time window (e.g. this-month, last-30-days); all time if omitted
        #[arg(short, long)]
        window: Option<TimeWindow>,
    },

    /// Show totals grouped by category
    Categories {
        /// Time window
        #[arg(short, long, default_value = "this-month")]
        window: TimeWindow,

        /// Transaction type to group (income or expense)
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: TransactionType,

        /// Only show the largest N categories
        #[arg(long)]
        top: Option<usize>,

        /// Write the breakdown to a CSV file instead
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show usage of active budgets
    Budgets {
        /// Write budget usage to a CSV file instead
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show month-by-month trends
    Trends {
        /// Number of months, ending with the current one
        #[arg(short, long)]
        months: Option<usize>,

        /// Show one series per category instead of monthly totals
        #[arg(long)]
        by_category: bool,

        /// Transaction type for per-category series
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: TransactionType,

        /// Write the monthly totals to a CSV file instead
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show descriptive statistics of amounts
    Stats {
        /// Window for per-transaction statistics
        #[arg(short, long, default_value = "this-month")]
        window: TimeWindow,

        /// Months for the monthly series
        #[arg(short, long)]
        months: Option<usize>,
    },

    /// Score financial health
    Health {
        /// Window the score is computed over
        #[arg(short, long, default_value = "last-month")]
        window: TimeWindow,
    },

    /// Project income and expenses forward
    Project {
        /// Months to project
        #[arg(short, long)]
        months: Option<u32>,
    },

    /// Show the overview of everything
    Dashboard {
        /// Window for the balance and spending sections
        #[arg(short, long, default_value = "this-month")]
        window: TimeWindow,
    },
}

/// Handle a report command
pub fn handle_report_command(
    ctx: &CommandContext,
    cmd: ReportCommand,
    out: &mut dyn Write,
) -> FintrackResult<()> {
    match cmd {
        ReportCommand::Balance { window } => handle_balance(ctx, window, out),
        ReportCommand::Categories {
            window,
            transaction_type,
            top,
            output,
        } => handle_categories(ctx, window, transaction_type, top, output, out),
        ReportCommand::Budgets { output } => handle_budgets(ctx, output, out),
        ReportCommand::Trends {
            months,
            by_category,
            transaction_type,
            output,
        } => {
            let months = months.unwrap_or(ctx.settings.trend_periods);
            if by_category {
                handle_category_trends(ctx, months, transaction_type, out)
            } else {
                handle_trends(ctx, months, output, out)
            }
        }
        ReportCommand::Stats { window, months } => {
            handle_stats(ctx, window, months.unwrap_or(ctx.settings.trend_periods), out)
        }
        ReportCommand::Health { window } => handle_health(ctx, window, out),
        ReportCommand::Project { months } => handle_project(
            ctx,
            months.unwrap_or(ctx.settings.projection_months),
            out,
        ),
        ReportCommand::Dashboard { window } => handle_dashboard(ctx, window, out),
    }
}

fn range_for(ctx: &CommandContext, window: TimeWindow) -> DateRange {
    ctx.settings.window_selector().range(window, ctx.reference)
}

/// Create a CSV file, run `write` against it and report where it went
fn write_csv_file<F>(path: &Path, rows: usize, write: F, out: &mut dyn Write) -> FintrackResult<()>
where
    F: FnOnce(BufWriter<File>) -> FintrackResult<()>,
{
    let file = File::create(path)?;
    write(BufWriter::new(file))?;
    info!(path = %path.display(), rows, "exported CSV");
    writeln!(out, "Exported {} rows to {}", rows, path.display())?;
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BalanceOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<DateRange>,
    #[serde(flatten)]
    balance: &'a crate::engine::BalanceResult,
}

fn handle_balance(
    ctx: &CommandContext,
    window: Option<TimeWindow>,
    out: &mut dyn Write,
) -> FintrackResult<()> {
    let transactions = &ctx.snapshot.transactions;
    let range = window.map(|w| range_for(ctx, w));
    let balance = match &range {
        Some(range) => calculate_balance(range.filter(transactions)),
        None => calculate_balance(transactions),
    };

    ctx.emit(
        &BalanceOutput {
            range,
            balance: &balance,
        },
        |opts| render_balance(&balance, range.as_ref(), opts),
        out,
    )
}

fn handle_categories(
    ctx: &CommandContext,
    window: TimeWindow,
    transaction_type: TransactionType,
    top: Option<usize>,
    output: Option<PathBuf>,
    out: &mut dyn Write,
) -> FintrackResult<()> {
    let range = range_for(ctx, window);
    let mut entries =
        calculate_spending_by_category(range.filter(&ctx.snapshot.transactions), transaction_type);
    if let Some(n) = top {
        entries = top_categories(&entries, n);
    }

    if let Some(path) = output {
        return write_csv_file(
            &path,
            entries.len(),
            |file| export_breakdown_csv(&entries, file),
            out,
        );
    }

    ctx.emit(&entries, |opts| render_breakdown(&entries, opts), out)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetsOutput<'a> {
    budgets: &'a [BudgetProgress],
    overview: &'a BudgetOverview,
}

fn handle_budgets(
    ctx: &CommandContext,
    output: Option<PathBuf>,
    out: &mut dyn Write,
) -> FintrackResult<()> {
    let progress =
        calculate_all_budget_progress(&ctx.snapshot.budgets, &ctx.snapshot.transactions);
    let overview = BudgetOverview::from_progress(&progress);

    if let Some(path) = output {
        return write_csv_file(
            &path,
            progress.len(),
            |file| export_budget_progress_csv(&progress, file),
            out,
        );
    }

    ctx.emit(
        &BudgetsOutput {
            budgets: &progress,
            overview: &overview,
        },
        |opts| render_budgets(&progress, &overview, opts),
        out,
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrendsOutput<'a> {
    points: &'a [TrendPoint],
    summary: &'a TrendSummary,
}

fn handle_trends(
    ctx: &CommandContext,
    months: usize,
    output: Option<PathBuf>,
    out: &mut dyn Write,
) -> FintrackResult<()> {
    let points = calculate_trends(&ctx.snapshot.transactions, months, ctx.reference);
    let summary = summarize_trends(&points);

    if let Some(path) = output {
        return write_csv_file(
            &path,
            points.len(),
            |file| export_trends_csv(&points, file),
            out,
        );
    }

    ctx.emit(
        &TrendsOutput {
            points: &points,
            summary: &summary,
        },
        |opts| render_trends(&points, &summary, opts),
        out,
    )
}

fn handle_category_trends(
    ctx: &CommandContext,
    months: usize,
    transaction_type: TransactionType,
    out: &mut dyn Write,
) -> FintrackResult<()> {
    let points = calculate_trends(&ctx.snapshot.transactions, months, ctx.reference);
    let trends: Vec<CategoryTrend> = calculate_category_trends(&points, transaction_type);
    ctx.emit(&trends, |opts| render_category_trends(&trends, opts), out)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOutput {
    range: DateRange,
    expense_amounts: StatisticsResult,
    income_amounts: StatisticsResult,
    monthly_expenses: StatisticsResult,
    monthly_balance: StatisticsResult,
}

fn amounts_of(transactions: &[&Transaction], transaction_type: TransactionType) -> StatisticsResult {
    let amounts: Vec<_> = transactions
        .iter()
        .filter(|t| t.transaction_type == transaction_type)
        .map(|t| t.effective_amount())
        .collect();
    calculate_money_statistics(&amounts)
}

fn handle_stats(
    ctx: &CommandContext,
    window: TimeWindow,
    months: usize,
    out: &mut dyn Write,
) -> FintrackResult<()> {
    let range = range_for(ctx, window);
    let in_window = range.filter(&ctx.snapshot.transactions);
    let points = calculate_trends(&ctx.snapshot.transactions, months, ctx.reference);
    let monthly = |f: fn(&TrendPoint) -> f64| -> StatisticsResult {
        calculate_statistics(&points.iter().map(f).collect::<Vec<_>>())
    };

    let stats = StatsOutput {
        range,
        expense_amounts: amounts_of(&in_window, TransactionType::Expense),
        income_amounts: amounts_of(&in_window, TransactionType::Income),
        monthly_expenses: monthly(|p| p.balance.expenses.to_f64()),
        monthly_balance: monthly(|p| p.balance.balance.to_f64()),
    };

    ctx.emit(
        &stats,
        |opts| {
            format!(
                "{}\n{}",
                opts.range(&stats.range),
                render_statistics(
                    &[
                        ("Expense amounts", &stats.expense_amounts),
                        ("Income amounts", &stats.income_amounts),
                        ("Monthly expenses", &stats.monthly_expenses),
                        ("Monthly balance", &stats.monthly_balance),
                    ],
                    opts,
                )
            )
        },
        out,
    )
}

fn handle_health(ctx: &CommandContext, window: TimeWindow, out: &mut dyn Write) -> FintrackResult<()> {
    let range = range_for(ctx, window);
    let transactions: Vec<Transaction> = range
        .filter(&ctx.snapshot.transactions)
        .into_iter()
        .cloned()
        .collect();
    let health = calculate_windowed_health_score(
        &transactions,
        &ctx.snapshot.transactions,
        &ctx.snapshot.budgets,
        ctx.reference,
    );

    ctx.emit(
        &health,
        |opts| format!("{}\n{}", opts.range(&range), render_health(&health, opts)),
        out,
    )
}

fn handle_project(ctx: &CommandContext, months: u32, out: &mut dyn Write) -> FintrackResult<()> {
    let projection = calculate_projections(&ctx.snapshot.transactions, months, ctx.reference);
    ctx.emit(&projection, |opts| render_projection(&projection, opts), out)
}

fn handle_dashboard(
    ctx: &CommandContext,
    window: TimeWindow,
    out: &mut dyn Write,
) -> FintrackResult<()> {
    let options = DashboardOptions::from_settings(&ctx.settings).with_window(window);
    let report = DashboardReport::generate(
        &ctx.snapshot.transactions,
        &ctx.snapshot.budgets,
        &options,
        ctx.reference,
    );
    ctx.emit(&report, |opts| render_dashboard(&report, opts), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{Budget, BudgetCadence, Money};
    use crate::storage::Snapshot;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn context(json: bool) -> CommandContext {
        let snapshot = Snapshot {
            transactions: vec![
                Transaction::income(Money::from_cents(300000), "Salary", date(2025, 2, 1)),
                Transaction::expense(Money::from_cents(21000), "Food", date(2025, 2, 3)),
                Transaction::expense(Money::from_cents(120000), "Rent", date(2025, 2, 5)),
                Transaction::expense(Money::from_cents(5000), "Food", date(2025, 1, 20)),
            ],
            budgets: vec![Budget::new(
                "Food",
                Money::from_cents(20000),
                BudgetCadence::Monthly,
                date(2025, 2, 1),
                date(2025, 2, 28),
            )],
            categories: Vec::new(),
        };
        CommandContext::new(
            Settings::default(),
            snapshot,
            date(2025, 2, 10).and_hms_opt(12, 0, 0).unwrap(),
            json,
        )
    }

    fn run(ctx: &CommandContext, cmd: ReportCommand) -> String {
        let mut out = Vec::new();
        handle_report_command(ctx, cmd, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn run_json(cmd: ReportCommand) -> serde_json::Value {
        serde_json::from_str(&run(&context(true), cmd)).unwrap()
    }

    #[test]
    fn test_balance_all_time_and_windowed() {
        let all = run_json(ReportCommand::Balance { window: None });
        assert_eq!(all["income"], 3000.0);
        assert_eq!(all["expenses"], 1460.0);
        assert!(all.get("range").is_none());

        let month = run_json(ReportCommand::Balance {
            window: Some(TimeWindow::ThisMonth),
        });
        assert_eq!(month["expenses"], 1410.0);
        assert_eq!(month["balance"], 1590.0);
        assert!(month.get("range").is_some());
    }

    #[test]
    fn test_categories_top() {
        let value = run_json(ReportCommand::Categories {
            window: TimeWindow::ThisMonth,
            transaction_type: TransactionType::Expense,
            top: Some(1),
            output: None,
        });
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["category"], "Rent");
    }

    #[test]
    fn test_categories_csv_output() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.csv");

        let printed = run(
            &context(false),
            ReportCommand::Categories {
                window: TimeWindow::ThisMonth,
                transaction_type: TransactionType::Expense,
                top: None,
                output: Some(path.clone()),
            },
        );
        assert!(printed.starts_with("Exported 2 rows"));

        let csv = std::fs::read_to_string(&path).unwrap();
        assert!(csv.starts_with("category,amount,transactions,percentage"));
        assert!(csv.contains("Rent,1200.00,1,"));
    }

    #[test]
    fn test_budgets_json() {
        let value = run_json(ReportCommand::Budgets { output: None });
        assert_eq!(value["budgets"][0]["percentage"], 105.0);
        assert_eq!(value["budgets"][0]["status"], "exceeded");
        assert_eq!(value["overview"]["budgetCount"], 1);
    }

    #[test]
    fn test_trends_length_follows_months() {
        let value = run_json(ReportCommand::Trends {
            months: Some(2),
            by_category: false,
            transaction_type: TransactionType::Expense,
            output: None,
        });
        assert_eq!(value["points"].as_array().unwrap().len(), 2);
        assert_eq!(value["points"][1]["periodLabel"], "Feb 2025");
    }

    #[test]
    fn test_stats_json() {
        let value = run_json(ReportCommand::Stats {
            window: TimeWindow::ThisMonth,
            months: Some(2),
        });
        assert_eq!(value["expenseAmounts"]["count"], 2);
        assert_eq!(value["expenseAmounts"]["sum"], 1410.0);
        assert_eq!(value["monthlyExpenses"]["count"], 2);
    }

    #[test]
    fn test_table_output() {
        let ctx = context(false);
        let text = run(&ctx, ReportCommand::Dashboard {
            window: TimeWindow::ThisMonth,
        });
        assert!(text.contains("Food"));

        let text = run(&ctx, ReportCommand::Project { months: Some(2) });
        assert!(!text.is_empty());

        let text = run(&ctx, ReportCommand::Health {
            window: TimeWindow::ThisMonth,
        });
        assert!(text.contains("2025-02-01 to 2025-02-28"));
    }

    #[test]
    fn test_health_window_still_sees_last_month() {
        let mut ctx = context(true);
        ctx.snapshot.transactions.push(Transaction::expense(
            Money::from_cents(200000),
            "Rent",
            date(2025, 1, 5),
        ));

        let mut out = Vec::new();
        handle_report_command(
            &ctx,
            ReportCommand::Health {
                window: TimeWindow::ThisMonth,
            },
            &mut out,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["factors"]["income"], 3000.0);
        assert_eq!(value["factors"]["lastMonthExpenses"], 2050.0);
        assert_eq!(value["factors"]["hasEmergencyFund"], false);
    }

    #[test]
    fn test_time_date_format_renders_iso_dates() {
        let mut ctx = context(false);
        ctx.settings.date_format = "%Y-%m-%d %H:%M".to_string();

        let text = run(&ctx, ReportCommand::Health {
            window: TimeWindow::LastMonth,
        });
        assert!(text.contains("2025-01-01 to 2025-01-31"));
    }
}
