//! CSV export of engine results
//!
//! Amounts are written as plain decimals without a currency symbol so the
//! files open cleanly in spreadsheets.

use serde::Serialize;
use std::io::Write;

use crate::engine::{BudgetProgress, CategoryBreakdownEntry, TrendPoint};
use crate::error::FintrackResult;
use crate::models::Money;

#[derive(Serialize)]
struct BreakdownRow<'a> {
    category: &'a str,
    amount: String,
    transactions: usize,
    percentage: String,
}

#[derive(Serialize)]
struct TrendRow<'a> {
    month: &'a str,
    start: String,
    end: String,
    income: String,
    expenses: String,
    balance: String,
    top_category: &'a str,
}

#[derive(Serialize)]
struct BudgetRow<'a> {
    category: &'a str,
    budget: String,
    spent: String,
    remaining: String,
    percentage: String,
    status: String,
}

fn amount(money: Money) -> String {
    format!("{:.2}", money.to_f64())
}

fn percent(value: f64) -> String {
    format!("{:.2}", value)
}

/// Write a category breakdown
pub fn export_breakdown_csv<W: Write>(
    entries: &[CategoryBreakdownEntry],
    writer: W,
) -> FintrackResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    for entry in entries {
        csv.serialize(BreakdownRow {
            category: &entry.category,
            amount: amount(entry.amount),
            transactions: entry.transaction_count,
            percentage: percent(entry.percentage),
        })?;
    }
    write_header_if_empty(
        &mut csv,
        entries.is_empty(),
        &["category", "amount", "transactions", "percentage"],
    )?;
    csv.flush()?;
    Ok(())
}

/// Write one row per trend month
pub fn export_trends_csv<W: Write>(points: &[TrendPoint], writer: W) -> FintrackResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    for point in points {
        csv.serialize(TrendRow {
            month: &point.period_label,
            start: point.start.format("%Y-%m-%d").to_string(),
            end: point.end.format("%Y-%m-%d").to_string(),
            income: amount(point.balance.income),
            expenses: amount(point.balance.expenses),
            balance: amount(point.balance.balance),
            top_category: point
                .category_breakdown
                .first()
                .map(|e| e.category.as_str())
                .unwrap_or(""),
        })?;
    }
    write_header_if_empty(
        &mut csv,
        points.is_empty(),
        &["month", "start", "end", "income", "expenses", "balance", "top_category"],
    )?;
    csv.flush()?;
    Ok(())
}

/// Write budget usage
pub fn export_budget_progress_csv<W: Write>(
    progress: &[BudgetProgress],
    writer: W,
) -> FintrackResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    for p in progress {
        csv.serialize(BudgetRow {
            category: &p.category,
            budget: amount(p.budget_amount),
            spent: amount(p.spent),
            remaining: amount(p.remaining),
            percentage: percent(p.percentage),
            status: p.status.to_string(),
        })?;
    }
    write_header_if_empty(
        &mut csv,
        progress.is_empty(),
        &["category", "budget", "spent", "remaining", "percentage", "status"],
    )?;
    csv.flush()?;
    Ok(())
}

/// `serialize` only emits headers with the first row
fn write_header_if_empty<W: Write>(
    csv: &mut ::csv::Writer<W>,
    empty: bool,
    header: &[&str],
) -> FintrackResult<()> {
    if empty {
        csv.write_record(header)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{calculate_spending_by_category, calculate_trends};
    use crate::models::{Transaction, TransactionType};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn transactions() -> Vec<Transaction> {
        vec![
            Transaction::income(Money::from_cents(100000), "Salary", date(2025, 1, 1)),
            Transaction::expense(Money::from_cents(2550), "Food, Groceries", date(2025, 1, 2)),
            Transaction::expense(Money::from_cents(7450), "Rent", date(2025, 1, 3)),
        ]
    }

    #[test]
    fn test_export_breakdown() {
        let entries = calculate_spending_by_category(&transactions(), TransactionType::Expense);
        let mut output = Vec::new();
        export_breakdown_csv(&entries, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "category,amount,transactions,percentage");
        assert_eq!(lines[1], "Rent,74.50,1,74.50");
        assert_eq!(lines[2], "\"Food, Groceries\",25.50,1,25.50");
    }

    #[test]
    fn test_export_empty_breakdown_has_header() {
        let mut output = Vec::new();
        export_breakdown_csv(&[], &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap().trim(),
            "category,amount,transactions,percentage"
        );
    }

    #[test]
    fn test_export_trends() {
        let reference = date(2025, 2, 14).and_hms_opt(0, 0, 0).unwrap();
        let points = calculate_trends(&transactions(), 2, reference);
        let mut output = Vec::new();
        export_trends_csv(&points, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Jan 2025,2025-01-01,2025-01-31,1000.00,100.00,900.00,Rent");
        assert_eq!(lines[2], "Feb 2025,2025-02-01,2025-02-28,0.00,0.00,0.00,");
    }
}
