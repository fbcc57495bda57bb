//! Table rendering of engine results
//!
//! Each `render_*` function turns one derived structure into a rounded
//! `tabled` table ready to print.

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::{
    format_bar, format_change, format_date, format_money, format_percentage, truncate,
};
use crate::engine::{
    BalanceResult, BudgetOverview, BudgetProgress, CategoryBreakdownEntry, CategoryTrend,
    DateRange, FinancialHealth, ProjectionResult, StatisticsResult, TrendPoint, TrendSummary,
};
use crate::models::{Category, Money};
use crate::reports::DashboardReport;

const NAME_WIDTH: usize = 24;
const BAR_WIDTH: usize = 10;

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Currency, date format and category names used when rendering
#[derive(Debug, Clone, Copy)]
pub struct DisplayOptions<'a> {
    pub currency_symbol: &'a str,
    pub categories: &'a [Category],
    /// strftime format for dates; unusable formats fall back to ISO dates
    pub date_format: &'a str,
}

impl<'a> DisplayOptions<'a> {
    pub fn new(currency_symbol: &'a str, categories: &'a [Category]) -> Self {
        Self {
            currency_symbol,
            categories,
            date_format: DEFAULT_DATE_FORMAT,
        }
    }

    pub fn with_date_format(mut self, date_format: &'a str) -> Self {
        self.date_format = date_format;
        self
    }

    /// First and last day of a range
    pub fn range(&self, range: &DateRange) -> String {
        format!(
            "{} to {}",
            self.date(range.first_day()),
            self.date(range.last_day())
        )
    }

    fn date(&self, date: NaiveDate) -> String {
        format_date(date, self.date_format)
            .unwrap_or_else(|| date.format(DEFAULT_DATE_FORMAT).to_string())
    }

    fn money(&self, amount: Money) -> String {
        format_money(amount, self.currency_symbol)
    }

    /// Category name for a key that may be a category id
    fn name(&self, key: &str) -> String {
        let name = self
            .categories
            .iter()
            .find(|c| c.matches(key))
            .map(|c| c.name.as_str())
            .unwrap_or(key);
        truncate(name, NAME_WIDTH)
    }
}

impl Default for DisplayOptions<'_> {
    fn default() -> Self {
        Self::new("$", &[])
    }
}

fn table<R: Tabled>(rows: Vec<R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "")]
    field: String,
    #[tabled(rename = "")]
    value: String,
}

fn field(field: &str, value: impl Into<String>) -> FieldRow {
    FieldRow {
        field: field.to_string(),
        value: value.into(),
    }
}

/// Income, expenses and balance for a range
pub fn render_balance(
    balance: &BalanceResult,
    range: Option<&DateRange>,
    opts: &DisplayOptions,
) -> String {
    let mut rows = Vec::new();
    if let Some(range) = range {
        rows.push(field("Period", opts.range(range)));
    }
    rows.push(field("Income", opts.money(balance.income)));
    rows.push(field("Expenses", opts.money(balance.expenses)));
    rows.push(field("Balance", opts.money(balance.balance)));
    table(rows)
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "")]
    bar: String,
}

/// Category breakdown with a share bar
pub fn render_breakdown(entries: &[CategoryBreakdownEntry], opts: &DisplayOptions) -> String {
    if entries.is_empty() {
        return "No transactions in this period.".to_string();
    }

    table(
        entries
            .iter()
            .map(|e| BreakdownRow {
                category: opts.name(&e.category),
                amount: opts.money(e.amount),
                count: e.transaction_count,
                share: format_percentage(e.percentage),
                bar: format_bar(e.percentage, 100.0, BAR_WIDTH),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Budget usage, followed by a one-line summary
pub fn render_budgets(
    progress: &[BudgetProgress],
    overview: &BudgetOverview,
    opts: &DisplayOptions,
) -> String {
    if progress.is_empty() {
        return "No active budgets.".to_string();
    }

    let rows: Vec<BudgetRow> = progress
        .iter()
        .map(|p| BudgetRow {
            category: opts.name(&p.category),
            budget: opts.money(p.budget_amount),
            spent: opts.money(p.spent),
            remaining: match p.overage() {
                over if over > Money::zero() => format!("-{}", opts.money(over)),
                _ => opts.money(p.remaining),
            },
            used: format!(
                "{} {}",
                format_bar(p.percentage, 100.0, BAR_WIDTH),
                format_percentage(p.percentage)
            ),
            status: p.status.to_string(),
        })
        .collect();

    format!(
        "{}\n{} budgeted, {} spent ({}); {} of {} need attention",
        table(rows),
        opts.money(overview.total_budgeted),
        opts.money(overview.total_spent),
        format_percentage(overview.percentage()),
        overview.needs_attention(),
        overview.budget_count
    )
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Top category")]
    top: String,
}

/// One row per month, then the direction of each series
pub fn render_trends(
    points: &[TrendPoint],
    summary: &TrendSummary,
    opts: &DisplayOptions,
) -> String {
    let rows: Vec<TrendRow> = points
        .iter()
        .map(|p| TrendRow {
            month: p.period_label.clone(),
            income: opts.money(p.balance.income),
            expenses: opts.money(p.balance.expenses),
            balance: opts.money(p.balance.balance),
            top: p
                .category_breakdown
                .first()
                .map(|e| opts.name(&e.category))
                .unwrap_or_default(),
        })
        .collect();

    format!(
        "{}\nIncome {} ({}), expenses {} ({}), balance {}",
        table(rows),
        summary.income_direction,
        format_change(summary.income_change),
        summary.expense_direction,
        format_change(summary.expense_change),
        summary.balance_direction
    )
}

#[derive(Tabled)]
struct CategoryTrendRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Trend")]
    direction: String,
}

/// Per-category totals and directions
pub fn render_category_trends(trends: &[CategoryTrend], opts: &DisplayOptions) -> String {
    if trends.is_empty() {
        return "No category activity in this period.".to_string();
    }

    table(
        trends
            .iter()
            .map(|t| CategoryTrendRow {
                category: opts.name(&t.category),
                total: opts.money(t.total),
                change: format_change(t.change_percentage),
                direction: t.direction.to_string(),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct StatisticsRow {
    #[tabled(rename = "Series")]
    series: String,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Median")]
    median: String,
    #[tabled(rename = "Std dev")]
    standard_deviation: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Sum")]
    sum: String,
    #[tabled(rename = "N")]
    count: usize,
}

/// Statistics for named series of currency values
pub fn render_statistics(series: &[(&str, &StatisticsResult)], opts: &DisplayOptions) -> String {
    let money = |value: f64| opts.money(Money::from_f64(value));
    table(
        series
            .iter()
            .map(|(name, stats)| StatisticsRow {
                series: name.to_string(),
                mean: money(stats.mean),
                median: money(stats.median),
                standard_deviation: money(stats.standard_deviation),
                min: money(stats.min),
                max: money(stats.max),
                sum: money(stats.sum),
                count: stats.count,
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Check")]
    check: String,
    #[tabled(rename = "Points")]
    points: String,
}

/// Score, grade, scored checks and recommendations
pub fn render_health(health: &FinancialHealth, opts: &DisplayOptions) -> String {
    let rows: Vec<ComponentRow> = health
        .components
        .iter()
        .map(|c| ComponentRow {
            check: c.check.to_string(),
            points: if c.passed() {
                format!("{}/{} ok", c.points, c.max_points)
            } else {
                format!("{}/{}", c.points, c.max_points)
            },
        })
        .collect();

    let mut output = format!(
        "Score {} / 100, grade {}\nSavings rate {}, budget use {}, balance {}\n{}",
        health.score,
        health.grade,
        format_percentage(health.factors.savings_rate),
        format_percentage(health.factors.budget_utilization),
        opts.money(health.factors.balance),
        table(rows)
    );

    for (i, recommendation) in health.recommendations.iter().enumerate() {
        output.push_str(&format!("\n{}. {}", i + 1, recommendation));
    }
    output
}

/// Monthly averages and projected totals
pub fn render_projection(projection: &ProjectionResult, opts: &DisplayOptions) -> String {
    if projection.based_on_months == 0 {
        return "Not enough history to project: no full month of data yet.".to_string();
    }

    let averages = &projection.monthly_averages;
    let rows = vec![
        field("History", format!("{} month(s)", projection.based_on_months)),
        field("Average income", opts.money(averages.income)),
        field("Average expenses", opts.money(averages.expenses)),
        field("Average savings", opts.money(averages.savings)),
        field(
            &format!("Income over {} month(s)", projection.months),
            opts.money(projection.projected_income),
        ),
        field(
            &format!("Expenses over {} month(s)", projection.months),
            opts.money(projection.projected_expenses),
        ),
        field(
            &format!("Savings over {} month(s)", projection.months),
            opts.money(projection.projected_savings),
        ),
    ];
    format!(
        "{}\nLinear projection from monthly averages; seasonality is not modelled.",
        table(rows)
    )
}

/// The whole dashboard
pub fn render_dashboard(report: &DashboardReport, opts: &DisplayOptions) -> String {
    let sections = [
        format!(
            "Balance ({})\n{}",
            report.window,
            render_balance(&report.balance, Some(&report.range), opts)
        ),
        format!("Top spending\n{}", render_breakdown(&report.top_expenses, opts)),
        format!(
            "Budgets\n{}",
            render_budgets(&report.budgets, &report.budget_overview, opts)
        ),
        format!(
            "Financial health ({})\n{}",
            opts.range(&report.health_range),
            render_health(&report.health, opts)
        ),
        format!("Projection\n{}", render_projection(&report.projection, opts)),
    ];
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        calculate_budget_progress, calculate_financial_health_score, calculate_spending_by_category,
        calculate_statistics,
    };
    use crate::models::{Budget, BudgetCadence, Transaction, TransactionType};

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn test_range_with_time_format_falls_back() {
        let range = DateRange::month(2025, 1);
        let opts = DisplayOptions::default().with_date_format("%Y-%m-%d %H:%M");
        assert_eq!(opts.range(&range), "2025-01-01 to 2025-01-31");

        let opts = DisplayOptions::default().with_date_format("%d.%m.%Y");
        assert_eq!(opts.range(&range), "01.01.2025 to 31.01.2025");
    }

    #[test]
    fn test_render_balance() {
        let balance = BalanceResult::new(Money::from_cents(10000), Money::from_cents(2550));
        let output = render_balance(&balance, None, &DisplayOptions::default());
        assert!(output.contains("Income"));
        assert!(output.contains("$100.00"));
        assert!(output.contains("$74.50"));
    }

    #[test]
    fn test_render_breakdown_uses_category_names() {
        let categories = vec![serde_json::from_str::<Category>(
            r#"{"id": "c-1", "name": "Groceries", "type": "expense"}"#,
        )
        .unwrap()];
        let transactions = vec![Transaction::expense(Money::from_cents(500), "c-1", jan(2))];
        let entries = calculate_spending_by_category(&transactions, TransactionType::Expense);

        let output = render_breakdown(&entries, &DisplayOptions::new("€", &categories));
        assert!(output.contains("Groceries"));
        assert!(output.contains("€5.00"));
        assert!(!output.contains("c-1"));
    }

    #[test]
    fn test_render_empty_sections() {
        let opts = DisplayOptions::default();
        assert_eq!(render_breakdown(&[], &opts), "No transactions in this period.");
        assert_eq!(
            render_budgets(&[], &BudgetOverview::default(), &opts),
            "No active budgets."
        );
        assert!(render_projection(&ProjectionResult::default(), &opts).starts_with("Not enough"));
    }

    #[test]
    fn test_render_budgets() {
        let budget = Budget::new(
            "Food",
            Money::from_cents(20000),
            BudgetCadence::Monthly,
            jan(1),
            jan(31),
        );
        let transactions = vec![Transaction::expense(Money::from_cents(22000), "Food", jan(3))];
        let progress = vec![calculate_budget_progress(&budget, &transactions)];
        let overview = BudgetOverview::from_progress(&progress);

        let output = render_budgets(&progress, &overview, &DisplayOptions::default());
        assert!(output.contains("exceeded"));
        assert!(output.contains("110%"));
        assert!(output.contains("-$20.00"));
        assert!(output.contains("1 of 1 need attention"));
    }

    #[test]
    fn test_render_health_lists_recommendations() {
        let reference = jan(20).and_hms_opt(0, 0, 0).unwrap();
        let health = calculate_financial_health_score(&[], &[], reference);
        let output = render_health(&health, &DisplayOptions::default());
        assert!(output.contains("grade F"));
        assert!(output.contains("1. Record a source of income"));
        assert!(output.contains("3. "));
    }

    #[test]
    fn test_render_statistics() {
        let stats = calculate_statistics(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let output = render_statistics(&[("Expenses", &stats)], &DisplayOptions::default());
        assert!(output.contains("Expenses"));
        assert!(output.contains("$3.00"));
        assert!(output.contains("$1.41"));
    }
}
