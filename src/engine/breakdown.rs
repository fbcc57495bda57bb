//! Category breakdown
//!
//! Groups one type of transaction by category and reports each group's
//! total, count and share of the overall total.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::models::{Money, Transaction, TransactionType};

/// One category's share of a transaction set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownEntry {
    /// Category key, or `Other` for uncategorized records
    pub category: String,
    /// Total amount in the category
    pub amount: Money,
    /// Number of transactions in the category
    pub transaction_count: usize,
    /// Share of the total across all categories, 0-100
    pub percentage: f64,
}

/// Group transactions of one type by category
///
/// Entries are sorted by amount descending, ties broken by category name
/// ascending. The input is only borrowed.
pub fn calculate_spending_by_category<'a, I>(
    transactions: I,
    transaction_type: TransactionType,
) -> Vec<CategoryBreakdownEntry>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    if transaction_type == TransactionType::Unknown {
        return Vec::new();
    }

    let mut groups: HashMap<&'a str, (Money, usize)> = HashMap::new();
    for txn in transactions
        .into_iter()
        .filter(|t| t.transaction_type == transaction_type)
    {
        let entry = groups
            .entry(txn.category_key())
            .or_insert((Money::zero(), 0));
        entry.0 += txn.effective_amount();
        entry.1 += 1;
    }

    let total: Money = groups.values().map(|(amount, _)| *amount).sum();

    let mut entries: Vec<CategoryBreakdownEntry> = groups
        .into_iter()
        .map(|(category, (amount, transaction_count))| CategoryBreakdownEntry {
            category: category.to_string(),
            amount,
            transaction_count,
            percentage: amount.percentage_of(total),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });

    debug!(
        %transaction_type,
        categories = entries.len(),
        total = %total,
        "calculated category breakdown"
    );
    entries
}

/// The first `n` entries of a sorted breakdown
pub fn top_categories(entries: &[CategoryBreakdownEntry], n: usize) -> Vec<CategoryBreakdownEntry> {
    entries.iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn expense(cents: i64, category: &str) -> Transaction {
        Transaction::expense(Money::from_cents(cents), category, jan(10))
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<Transaction> = Vec::new();
        assert!(calculate_spending_by_category(&empty, TransactionType::Expense).is_empty());
    }

    #[test]
    fn test_groups_and_percentages() {
        let transactions = vec![
            expense(5000, "Food"),
            expense(3000, "Food"),
            expense(2000, "Transport"),
            Transaction::income(Money::from_cents(100000), "Salary", jan(1)),
        ];

        let entries = calculate_spending_by_category(&transactions, TransactionType::Expense);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, "Food");
        assert_eq!(entries[0].amount.cents(), 8000);
        assert_eq!(entries[0].transaction_count, 2);
        assert_eq!(entries[0].percentage, 80.0);
        assert_eq!(entries[1].category, "Transport");
        assert_eq!(entries[1].percentage, 20.0);
    }

    #[test]
    fn test_ties_sorted_by_name() {
        let transactions = vec![
            expense(1000, "Zoo"),
            expense(1000, "Art"),
            expense(1000, "Movies"),
            expense(4000, "Rent"),
        ];

        let names: Vec<_> = calculate_spending_by_category(&transactions, TransactionType::Expense)
            .into_iter()
            .map(|e| e.category)
            .collect();
        assert_eq!(names, vec!["Rent", "Art", "Movies", "Zoo"]);
    }

    #[test]
    fn test_missing_category_goes_to_other() {
        let mut uncategorized = expense(700, "");
        uncategorized.category = None;
        let transactions = vec![uncategorized, expense(300, "   ")];

        let entries = calculate_spending_by_category(&transactions, TransactionType::Expense);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, "Other");
        assert_eq!(entries[0].amount.cents(), 1000);
        assert_eq!(entries[0].percentage, 100.0);
    }

    #[test]
    fn test_zero_total_has_zero_percentages() {
        let transactions = vec![expense(0, "Food"), expense(0, "Fun")];
        let entries = calculate_spending_by_category(&transactions, TransactionType::Expense);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.percentage == 0.0));
    }

    #[test]
    fn test_input_not_reordered() {
        let transactions = vec![expense(100, "B"), expense(900, "A")];
        let before = transactions.clone();
        let _ = calculate_spending_by_category(&transactions, TransactionType::Expense);
        assert_eq!(transactions, before);
    }

    #[test]
    fn test_top_categories() {
        let transactions = vec![expense(300, "A"), expense(200, "B"), expense(100, "C")];
        let entries = calculate_spending_by_category(&transactions, TransactionType::Expense);
        let top = top_categories(&entries, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[1].category, "B");
        assert_eq!(top_categories(&entries, 10).len(), 3);
    }
}
