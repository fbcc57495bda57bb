//! Calculation engine
//!
//! Pure, synchronous functions that turn in-memory transaction and budget
//! snapshots into balances, breakdowns, budget progress, trends, statistics,
//! health scores and projections.
//!
//! Every function is total: empty input, missing fields and zero
//! denominators produce zeroed results, never an error or a panic. Nothing
//! here performs I/O or reads the clock; time-sensitive functions take an
//! explicit reference instant. Inputs are only borrowed and never reordered.

pub mod balance;
pub mod breakdown;
pub mod budget_progress;
pub mod health;
pub mod projection;
pub mod statistics;
pub mod trends;
pub mod window;

pub use balance::{calculate_balance, total_of_type, BalanceResult};
pub use breakdown::{calculate_spending_by_category, top_categories, CategoryBreakdownEntry};
pub use budget_progress::{
    calculate_all_budget_progress, calculate_budget_progress, BudgetOverview, BudgetProgress,
    BudgetStatus,
};
pub use health::{
    calculate_financial_health_score, calculate_windowed_health_score, FinancialHealth, Grade,
    HealthCheck, HealthFactors, Recommendation, RecommendationKind, ScoreComponent,
    MAX_RECOMMENDATIONS,
};
pub use projection::{calculate_projections, MonthlyAverages, ProjectionResult};
pub use statistics::{calculate_money_statistics, calculate_statistics, StatisticsResult};
pub use trends::{
    calculate_category_trends, calculate_percentage_change, calculate_trends, classify_trend,
    summarize_trends, CategoryTrend, TrendDirection, TrendPoint, TrendSummary,
};
pub use window::{get_date_range, DateRange, TimeWindow, WindowParseError, WindowSelector};
