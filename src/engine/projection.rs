//! Projections from historical monthly averages

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::balance::calculate_balance;
use super::window::start_of_day;
use crate::models::{Money, Transaction};

/// Average income, expenses and savings per month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAverages {
    pub income: Money,
    pub expenses: Money,
    pub savings: Money,
}

/// Projected totals for the coming months
///
/// This is a naive linear model: each projected value is the historical
/// monthly average multiplied by the number of months. It has no
/// seasonality, no growth and no regression, so one unusual month moves
/// every projection by the same amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub projected_income: Money,
    pub projected_expenses: Money,
    pub projected_savings: Money,
    pub monthly_averages: MonthlyAverages,
    /// Full months of history the averages were taken over
    pub based_on_months: u32,
    /// Months projected
    pub months: u32,
}

fn month_index(instant: NaiveDateTime) -> i64 {
    i64::from(instant.year()) * 12 + i64::from(instant.month0())
}

/// Average per month, rounded once to the nearest cent
fn monthly_average(total: Money, months: u32) -> Money {
    if months == 0 {
        return Money::zero();
    }
    Money::from_cents((total.cents() as f64 / f64::from(months)).round() as i64)
}

fn times(amount: Money, months: u32) -> Money {
    Money::from_cents(amount.cents().saturating_mul(i64::from(months)))
}

/// Project income, expenses and savings `months` ahead
///
/// History is every full calendar month from the month of the earliest
/// dated transaction through the month before the reference month. Months
/// in that span without any transactions count as zero. Transactions in or
/// after the reference month are ignored, as are undated ones.
pub fn calculate_projections(
    transactions: &[Transaction],
    months: u32,
    reference: NaiveDateTime,
) -> ProjectionResult {
    let current_month_start = start_of_day(
        reference
            .date()
            .with_day(1)
            .unwrap_or_else(|| reference.date()),
    );

    let history: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.date.is_some_and(|date| date < current_month_start))
        .collect();

    let based_on_months = history
        .iter()
        .filter_map(|t| t.date)
        .min()
        .map(|earliest| month_index(current_month_start) - month_index(earliest))
        .and_then(|span| u32::try_from(span).ok())
        .unwrap_or(0);

    let totals = calculate_balance(history.iter().copied());
    let income = monthly_average(totals.income, based_on_months);
    let expenses = monthly_average(totals.expenses, based_on_months);
    let monthly_averages = MonthlyAverages {
        income,
        expenses,
        savings: income - expenses,
    };

    debug!(
        based_on_months,
        months,
        average_income = %monthly_averages.income,
        average_expenses = %monthly_averages.expenses,
        "calculated projections"
    );

    ProjectionResult {
        projected_income: times(monthly_averages.income, months),
        projected_expenses: times(monthly_averages.expenses, months),
        projected_savings: times(monthly_averages.savings, months),
        monthly_averages,
        based_on_months,
        months,
    }
}
