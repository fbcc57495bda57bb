//! Read-only snapshot of transactions, budgets and categories
//!
//! A snapshot file is a JSON object with `transactions`, `budgets` and
//! `categories` arrays. Each record is decoded on its own: a record that is
//! not even an object is skipped with a warning, and a record that decodes
//! but breaks the record contract is kept (the engine copes with it) and
//! reported.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::file_io::read_json_required;
use crate::error::FintrackError;
use crate::models::{Budget, Category, Transaction};

/// Loaded records, ready to hand to the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// What happened while loading a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records that could not be decoded at all
    pub skipped: usize,
    /// Records kept despite failing validation
    pub invalid: usize,
}

/// Top-level shape with records left undecoded
#[derive(Debug, Default, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    transactions: Option<Vec<Value>>,
    #[serde(default)]
    budgets: Option<Vec<Value>>,
    #[serde(default)]
    categories: Option<Vec<Value>>,
}

fn decode_all<T>(kind: &str, raw: Option<Vec<Value>>, report: &mut LoadReport) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
{
    raw.unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(kind, index, error = %e, "skipping unreadable record");
                report.skipped += 1;
                None
            }
        })
        .collect()
}

impl Snapshot {
    /// Load a snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, LoadReport), FintrackError> {
        let path = path.as_ref();
        let raw: RawSnapshot = read_json_required(path)?;
        let (snapshot, report) = Self::from_raw(raw);

        info!(
            path = %path.display(),
            transactions = snapshot.transactions.len(),
            budgets = snapshot.budgets.len(),
            categories = snapshot.categories.len(),
            skipped = report.skipped,
            invalid = report.invalid,
            "loaded snapshot"
        );
        Ok((snapshot, report))
    }

    /// Decode a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<(Self, LoadReport), FintrackError> {
        let raw: RawSnapshot = serde_json::from_str(json)
            .map_err(|e| FintrackError::Snapshot(format!("Failed to parse snapshot: {}", e)))?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawSnapshot) -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        let snapshot = Self {
            transactions: decode_all("transaction", raw.transactions, &mut report),
            budgets: decode_all("budget", raw.budgets, &mut report),
            categories: decode_all("category", raw.categories, &mut report),
        };

        for txn in &snapshot.transactions {
            if let Err(e) = txn.validate() {
                warn!(id = %txn.id, error = %e, "invalid transaction");
                report.invalid += 1;
            }
        }
        for budget in &snapshot.budgets {
            if let Err(e) = budget.validate() {
                warn!(id = %budget.id, error = %e, "invalid budget");
                report.invalid += 1;
            }
        }
        for category in &snapshot.categories {
            if let Err(e) = category.validate() {
                warn!(id = %category.id, error = %e, "invalid category");
                report.invalid += 1;
            }
        }

        (snapshot, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"{
        "transactions": [
            {"id": "t1", "type": "income", "amount": 2500, "category": "c-salary", "date": "2025-01-01"},
            {"id": "t2", "type": "expense", "amount": "45.10", "categoryId": "c-food", "date": "2025-01-03T12:00:00Z"},
            {"id": "t3", "type": "expense", "amount": -5, "category": "c-food", "date": "2025-01-04"},
            "not a record",
            42
        ],
        "budgets": [
            {"id": "b1", "category": "c-food", "budgetAmount": 200, "period": "monthly",
             "startDate": "2025-01-01", "endDate": "2025-01-31", "isActive": true}
        ],
        "categories": [
            {"id": "c-food", "name": "Food", "type": "expense"},
            {"id": "c-salary", "name": "Salary", "type": "income"}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let (snapshot, report) = Snapshot::from_json(SNAPSHOT).unwrap();
        assert_eq!(snapshot.transactions.len(), 3);
        assert_eq!(snapshot.budgets.len(), 1);
        assert_eq!(snapshot.categories.len(), 2);
        assert_eq!(report.skipped, 2);
        // negative amount
        assert_eq!(report.invalid, 1);
        assert_eq!(snapshot.transactions[1].amount.cents(), 4510);
    }

    #[test]
    fn test_record_with_both_category_spellings_is_kept() {
        let json = r#"{"transactions": [
            {"type": "expense", "amount": 50, "category": "Food", "categoryId": "c-food", "date": "2025-01-03"}
        ]}"#;
        let (snapshot, report) = Snapshot::from_json(json).unwrap();
        assert_eq!(report, LoadReport::default());
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.transactions[0].category_key(), "Food");
        assert_eq!(snapshot.transactions[0].amount.cents(), 5000);
    }

    #[test]
    fn test_missing_and_null_sections() {
        let (snapshot, report) = Snapshot::from_json(r#"{"budgets": null}"#).unwrap();
        assert_eq!(snapshot, Snapshot::default());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn test_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let (snapshot, _) = Snapshot::load(&path).unwrap();
        assert_eq!(snapshot.transactions[0].id.as_str(), "t1");
    }

    #[test]
    fn test_load_errors() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Snapshot::load(temp_dir.path().join("missing.json")).is_err());
        assert!(Snapshot::from_json("[1, 2]").is_err());
    }
}
