//! Trend engine
//!
//! Runs the balance and category breakdown calculations over a sliding
//! sequence of calendar months to build a time series, then derives
//! percentage changes and an increasing/decreasing/stable direction.
//!
//! Months with no transactions still produce a point with a zeroed balance,
//! so `calculate_trends(txns, n, reference).len() == n` always holds.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use super::balance::{calculate_balance, BalanceResult};
use super::breakdown::{calculate_spending_by_category, CategoryBreakdownEntry};
use super::statistics::{calculate_money_statistics, StatisticsResult};
use super::window::months_ago;
use crate::models::{Money, Transaction, TransactionType};

/// Relative change, in percent, above which a series is increasing
pub const TREND_THRESHOLD: f64 = 10.0;

/// Change reported when growing from zero to a non-zero value
pub const FROM_ZERO_CHANGE: f64 = 100.0;

/// One calendar month of the series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Month label, e.g. `Jan 2025`
    pub period_label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub balance: BalanceResult,
    /// Expense breakdown for the month
    pub category_breakdown: Vec<CategoryBreakdownEntry>,
    /// Income breakdown for the month
    pub income_breakdown: Vec<CategoryBreakdownEntry>,
}

impl TrendPoint {
    /// The breakdown for one transaction type
    pub fn breakdown(&self, transaction_type: TransactionType) -> &[CategoryBreakdownEntry] {
        match transaction_type {
            TransactionType::Income => &self.income_breakdown,
            TransactionType::Expense => &self.category_breakdown,
            TransactionType::Unknown => &[],
        }
    }
}

/// Build one point per month for the `periods` months ending with the
/// reference month, oldest first
pub fn calculate_trends(
    transactions: &[Transaction],
    periods: usize,
    reference: NaiveDateTime,
) -> Vec<TrendPoint> {
    let today = reference.date();
    let points: Vec<TrendPoint> = (0..periods)
        .rev()
        .map(|back| {
            let range = months_ago(today, u32::try_from(back).unwrap_or(u32::MAX));
            let subset = range.filter(transactions);
            TrendPoint {
                period_label: range.label(),
                start: range.start,
                end: range.end,
                balance: calculate_balance(subset.iter().copied()),
                category_breakdown: calculate_spending_by_category(
                    subset.iter().copied(),
                    TransactionType::Expense,
                ),
                income_breakdown: calculate_spending_by_category(
                    subset.iter().copied(),
                    TransactionType::Income,
                ),
            }
        })
        .collect();

    debug!(
        periods,
        transactions = transactions.len(),
        "calculated monthly trends"
    );
    points
}

/// Percent change from `old_value` to `new_value`
///
/// Zero to zero is `0`. Zero to anything else is `+100` or `-100` depending
/// on the sign of the new value. Non-finite inputs count as zero.
pub fn calculate_percentage_change(old_value: f64, new_value: f64) -> f64 {
    let old_value = if old_value.is_finite() { old_value } else { 0.0 };
    let new_value = if new_value.is_finite() { new_value } else { 0.0 };

    if old_value == 0.0 {
        return if new_value > 0.0 {
            FROM_ZERO_CHANGE
        } else if new_value < 0.0 {
            -FROM_ZERO_CHANGE
        } else {
            0.0
        };
    }

    let change = (new_value - old_value) / old_value * 100.0;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

/// Direction of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Compare the mean of the first half of a series to the mean of the second
///
/// The halves are `series[..n/2]` and `series[n/2..]`, so the middle point
/// of an odd-length series belongs to the second half.
pub fn classify_trend(series: &[f64]) -> TrendDirection {
    if series.len() < 2 {
        return TrendDirection::Stable;
    }

    let (first, second) = series.split_at(series.len() / 2);
    let change = calculate_percentage_change(mean(first), mean(second));

    if change > TREND_THRESHOLD {
        TrendDirection::Increasing
    } else if change < -TREND_THRESHOLD {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

fn money_series(amounts: &[Money]) -> Vec<f64> {
    amounts.iter().map(Money::to_f64).collect()
}

fn first_to_last_change(amounts: &[Money]) -> f64 {
    match (amounts.first(), amounts.last()) {
        (Some(first), Some(last)) => calculate_percentage_change(first.to_f64(), last.to_f64()),
        _ => 0.0,
    }
}

/// Statistics and directions of the monthly totals in a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub months: usize,
    pub income: StatisticsResult,
    pub expenses: StatisticsResult,
    pub balance: StatisticsResult,
    pub income_direction: TrendDirection,
    pub expense_direction: TrendDirection,
    pub balance_direction: TrendDirection,
    /// Change from the first month's income to the last month's
    pub income_change: f64,
    /// Change from the first month's expenses to the last month's
    pub expense_change: f64,
}

/// Summarize a trend series
pub fn summarize_trends(points: &[TrendPoint]) -> TrendSummary {
    let income: Vec<Money> = points.iter().map(|p| p.balance.income).collect();
    let expenses: Vec<Money> = points.iter().map(|p| p.balance.expenses).collect();
    let balance: Vec<Money> = points.iter().map(|p| p.balance.balance).collect();

    TrendSummary {
        months: points.len(),
        income: calculate_money_statistics(&income),
        expenses: calculate_money_statistics(&expenses),
        balance: calculate_money_statistics(&balance),
        income_direction: classify_trend(&money_series(&income)),
        expense_direction: classify_trend(&money_series(&expenses)),
        balance_direction: classify_trend(&money_series(&balance)),
        income_change: first_to_last_change(&income),
        expense_change: first_to_last_change(&expenses),
    }
}

/// One category's monthly series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrend {
    pub category: String,
    /// One amount per trend point, oldest first; zero where absent
    pub amounts: Vec<Money>,
    pub total: Money,
    /// Change from the first month to the last
    pub change_percentage: f64,
    pub direction: TrendDirection,
}

/// Per-category series across trend points, largest total first
pub fn calculate_category_trends(
    points: &[TrendPoint],
    transaction_type: TransactionType,
) -> Vec<CategoryTrend> {
    let mut series: HashMap<&str, Vec<Money>> = HashMap::new();

    for (index, point) in points.iter().enumerate() {
        for entry in point.breakdown(transaction_type) {
            let amounts = series
                .entry(entry.category.as_str())
                .or_insert_with(|| vec![Money::zero(); points.len()]);
            amounts[index] += entry.amount;
        }
    }

    let mut trends: Vec<CategoryTrend> = series
        .into_iter()
        .map(|(category, amounts)| CategoryTrend {
            category: category.to_string(),
            total: amounts.iter().sum(),
            change_percentage: first_to_last_change(&amounts),
            direction: classify_trend(&money_series(&amounts)),
            amounts,
        })
        .collect();

    trends.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    trends
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference() -> NaiveDateTime {
        date(2025, 3, 15).and_hms_opt(12, 0, 0).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::income(Money::from_cents(100000), "Salary", date(2025, 1, 1)),
            Transaction::expense(Money::from_cents(20000), "Food", date(2025, 1, 9)),
            Transaction::income(Money::from_cents(100000), "Salary", date(2025, 3, 1)),
            Transaction::expense(Money::from_cents(40000), "Food", date(2025, 3, 2)),
            Transaction::expense(Money::from_cents(10000), "Fun", date(2025, 3, 3)),
            // outside the window
            Transaction::expense(Money::from_cents(99900), "Food", date(2024, 12, 31)),
        ]
    }

    #[test]
    fn test_length_and_order() {
        let points = calculate_trends(&sample(), 3, reference());
        assert_eq!(points.len(), 3);

        let labels: Vec<_> = points.iter().map(|p| p.period_label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 2025", "Feb 2025", "Mar 2025"]);

        assert_eq!(points[0].balance.balance.cents(), 80000);
        assert!(points[1].balance.is_empty());
        assert!(points[1].category_breakdown.is_empty());
        assert_eq!(points[2].balance.expenses.cents(), 50000);
        assert_eq!(points[2].category_breakdown[0].category, "Food");
        assert_eq!(points[2].income_breakdown[0].category, "Salary");
    }

    #[test]
    fn test_length_without_data() {
        assert_eq!(calculate_trends(&[], 12, reference()).len(), 12);
        assert!(calculate_trends(&sample(), 0, reference()).is_empty());
    }

    #[test]
    fn test_percentage_change() {
        assert_eq!(calculate_percentage_change(100.0, 150.0), 50.0);
        assert_eq!(calculate_percentage_change(200.0, 100.0), -50.0);
        assert_eq!(calculate_percentage_change(0.0, 0.0), 0.0);
        assert_eq!(calculate_percentage_change(0.0, 42.0), 100.0);
        assert_eq!(calculate_percentage_change(0.0, -42.0), -100.0);
        assert_eq!(calculate_percentage_change(f64::NAN, 5.0), 100.0);
        assert_eq!(calculate_percentage_change(5.0, f64::INFINITY), -100.0);
    }

    #[test]
    fn test_classify_trend() {
        assert_eq!(classify_trend(&[]), TrendDirection::Stable);
        assert_eq!(classify_trend(&[5.0]), TrendDirection::Stable);
        assert_eq!(classify_trend(&[100.0, 100.0, 150.0, 150.0]), TrendDirection::Increasing);
        assert_eq!(classify_trend(&[100.0, 100.0, 50.0, 50.0]), TrendDirection::Decreasing);
        assert_eq!(classify_trend(&[100.0, 105.0, 100.0, 108.0]), TrendDirection::Stable);
        // 10% exactly is not more than the threshold
        assert_eq!(classify_trend(&[100.0, 110.0]), TrendDirection::Stable);
        // odd length: the middle value belongs to the second half
        assert_eq!(classify_trend(&[10.0, 20.0, 20.0]), TrendDirection::Increasing);
        assert_eq!(classify_trend(&[0.0, 0.0, 3.0]), TrendDirection::Increasing);
    }

    #[test]
    fn test_summarize_trends() {
        let points = calculate_trends(&sample(), 3, reference());
        let summary = summarize_trends(&points);

        assert_eq!(summary.months, 3);
        assert_eq!(summary.income.sum, 2000.0);
        assert_eq!(summary.expenses.max, 500.0);
        assert_eq!(summary.expense_direction, TrendDirection::Increasing);
        assert_eq!(summary.expense_change, 150.0);
        assert_eq!(summary.income_change, 0.0);
    }

    #[test]
    fn test_category_trends() {
        let points = calculate_trends(&sample(), 3, reference());
        let trends = calculate_category_trends(&points, TransactionType::Expense);

        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].category, "Food");
        assert_eq!(
            trends[0].amounts,
            vec![
                Money::from_cents(20000),
                Money::zero(),
                Money::from_cents(40000)
            ]
        );
        assert_eq!(trends[0].total.cents(), 60000);
        assert_eq!(trends[0].change_percentage, 100.0);

        assert_eq!(trends[1].category, "Fun");
        assert_eq!(trends[1].change_percentage, 100.0);
        assert_eq!(trends[1].direction, TrendDirection::Increasing);

        let income = calculate_category_trends(&points, TransactionType::Income);
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].total.cents(), 200000);
        // 1000 vs mean(0, 1000)
        assert_eq!(income[0].direction, TrendDirection::Decreasing);
    }
}
