//! JSON output of engine results
//!
//! Every derived structure serializes with camelCase field names and money
//! as decimal currency units.

use serde::Serialize;
use std::io::Write;

use crate::error::FintrackResult;

/// Write a value as pretty-printed JSON followed by a newline
pub fn export_json<T, W>(value: &T, mut writer: W) -> FintrackResult<()>
where
    T: Serialize + ?Sized,
    W: Write,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{calculate_budget_progress, calculate_statistics};
    use crate::models::{Budget, BudgetCadence, Money, Transaction};
    use chrono::NaiveDate;

    #[test]
    fn test_export_statistics() {
        let mut output = Vec::new();
        export_json(&calculate_statistics(&[1.0, 2.0, 3.0, 4.0, 5.0]), &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["mean"], 3.0);
        assert_eq!(value["standardDeviation"].as_f64().unwrap().round(), 1.0);
        assert_eq!(value["count"], 5);
    }

    #[test]
    fn test_export_budget_progress() {
        let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        let budget = Budget::new(
            "Food",
            Money::from_cents(20000),
            BudgetCadence::Monthly,
            day(1),
            day(31),
        );
        let transactions = vec![Transaction::expense(Money::from_cents(22000), "Food", day(9))];
        let progress = calculate_budget_progress(&budget, &transactions);

        let mut output = Vec::new();
        export_json(&progress, &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["spent"], 220.0);
        assert_eq!(value["remaining"], 0.0);
        assert_eq!(value["percentage"], 110.0);
        assert_eq!(value["status"], "exceeded");
        assert_eq!(value["isExceeded"], true);
        assert_eq!(value["budgetAmount"], 200.0);
    }
}
