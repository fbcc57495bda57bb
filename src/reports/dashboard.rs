//! Dashboard report
//!
//! One pass over a snapshot that gathers everything the overview screen
//! shows: the selected window's balance and top categories, budget usage,
//! the monthly trend summary, financial health and projections.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::config::Settings;
use crate::engine::{
    calculate_all_budget_progress, calculate_balance, calculate_projections,
    calculate_spending_by_category, calculate_trends, calculate_windowed_health_score,
    summarize_trends,
    top_categories, BalanceResult, BudgetOverview, BudgetProgress, CategoryBreakdownEntry,
    DateRange, FinancialHealth, ProjectionResult, TimeWindow, TrendSummary, WindowSelector,
};
use crate::models::{Budget, Transaction, TransactionType};

/// Categories listed in the spending section
pub const DEFAULT_TOP_CATEGORIES: usize = 5;

/// What the dashboard covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Window for the balance and category sections
    pub window: TimeWindow,
    /// Window the health score is computed over
    pub health_window: TimeWindow,
    pub selector: WindowSelector,
    pub trend_periods: usize,
    pub projection_months: u32,
    pub top_categories: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl DashboardOptions {
    /// Options taken from user settings, showing this month
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            window: TimeWindow::ThisMonth,
            health_window: TimeWindow::LastMonth,
            selector: settings.window_selector(),
            trend_periods: settings.trend_periods,
            projection_months: settings.projection_months,
            top_categories: DEFAULT_TOP_CATEGORIES,
        }
    }

    /// Show a different window
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }
}

/// Everything on the overview screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub reference: NaiveDateTime,
    pub window: String,
    pub range: DateRange,
    /// Transactions dated inside the window
    pub transaction_count: usize,
    pub balance: BalanceResult,
    /// Balance across every transaction in the snapshot
    pub overall: BalanceResult,
    pub top_expenses: Vec<CategoryBreakdownEntry>,
    pub budgets: Vec<BudgetProgress>,
    pub budget_overview: BudgetOverview,
    pub trends: TrendSummary,
    pub health_range: DateRange,
    pub health: FinancialHealth,
    pub projection: ProjectionResult,
}

impl DashboardReport {
    /// Build the report as of `reference`
    pub fn generate(
        transactions: &[Transaction],
        budgets: &[Budget],
        options: &DashboardOptions,
        reference: NaiveDateTime,
    ) -> Self {
        let range = options.selector.range(options.window, reference);
        let in_window = range.filter(transactions);
        let expenses = calculate_spending_by_category(
            in_window.iter().copied(),
            TransactionType::Expense,
        );

        let budget_progress = calculate_all_budget_progress(budgets, transactions);
        let budget_overview = BudgetOverview::from_progress(&budget_progress);

        let trend_points = calculate_trends(transactions, options.trend_periods, reference);

        let health_range = options.selector.range(options.health_window, reference);
        let health_transactions: Vec<Transaction> = health_range
            .filter(transactions)
            .into_iter()
            .cloned()
            .collect();
        let health =
            calculate_windowed_health_score(&health_transactions, transactions, budgets, reference);

        debug!(
            window = %options.window,
            in_window = in_window.len(),
            budgets = budget_progress.len(),
            "generated dashboard"
        );

        Self {
            reference,
            window: options.window.to_string(),
            range,
            transaction_count: in_window.len(),
            balance: calculate_balance(in_window.iter().copied()),
            overall: calculate_balance(transactions),
            top_expenses: top_categories(&expenses, options.top_categories),
            budgets: budget_progress,
            budget_overview,
            trends: summarize_trends(&trend_points),
            health_range,
            health,
            projection: calculate_projections(transactions, options.projection_months, reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BudgetStatus, Grade};
    use crate::models::{BudgetCadence, Money};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture() -> (Vec<Transaction>, Vec<Budget>) {
        let transactions = vec![
            Transaction::income(Money::from_cents(400000), "Salary", date(2025, 1, 1)),
            Transaction::expense(Money::from_cents(150000), "Rent", date(2025, 1, 2)),
            Transaction::expense(Money::from_cents(30000), "Food", date(2025, 1, 12)),
            Transaction::income(Money::from_cents(400000), "Salary", date(2025, 2, 1)),
            Transaction::expense(Money::from_cents(150000), "Rent", date(2025, 2, 2)),
            Transaction::expense(Money::from_cents(18000), "Food", date(2025, 2, 6)),
            Transaction::expense(Money::from_cents(4000), "Fun", date(2025, 2, 7)),
        ];
        let budgets = vec![Budget::new(
            "Food",
            Money::from_cents(20000),
            BudgetCadence::Monthly,
            date(2025, 2, 1),
            date(2025, 2, 28),
        )];
        (transactions, budgets)
    }

    #[test]
    fn test_generate() {
        let (transactions, budgets) = fixture();
        let reference = date(2025, 2, 10).and_hms_opt(18, 0, 0).unwrap();
        let report = DashboardReport::generate(
            &transactions,
            &budgets,
            &DashboardOptions::default(),
            reference,
        );

        assert_eq!(report.window, "this-month");
        assert_eq!(report.transaction_count, 4);
        assert_eq!(report.balance.expenses.cents(), 172000);
        assert_eq!(report.overall.income.cents(), 800000);
        assert_eq!(report.top_expenses[0].category, "Rent");
        assert_eq!(report.top_expenses.len(), 3);

        assert_eq!(report.budgets.len(), 1);
        assert_eq!(report.budgets[0].status, BudgetStatus::Critical);
        assert_eq!(report.budget_overview.critical_count, 1);

        assert_eq!(report.trends.months, 6);

        // January: +4000 income, 1800 spent, balance 2200 < 3 x 1800
        assert_eq!(report.health_range.first_day(), date(2025, 1, 1));
        assert_eq!(report.health.factors.income.cents(), 400000);
        assert_eq!(report.health.score, 80);
        assert_eq!(report.health.grade, Grade::B);

        assert_eq!(report.projection.based_on_months, 1);
        assert_eq!(report.projection.projected_income.cents(), 1200000);
    }

    #[test]
    fn test_empty_snapshot() {
        let reference = date(2025, 2, 10).and_hms_opt(0, 0, 0).unwrap();
        let options = DashboardOptions::default().with_window(TimeWindow::Last30Days);
        let report = DashboardReport::generate(&[], &[], &options, reference);

        assert_eq!(report.transaction_count, 0);
        assert!(report.balance.is_empty());
        assert!(report.top_expenses.is_empty());
        assert!(report.budgets.is_empty());
        assert_eq!(report.health.score, 0);
        assert_eq!(report.projection.based_on_months, 0);
    }
}
