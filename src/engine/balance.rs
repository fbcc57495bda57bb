//! Balance aggregation
//!
//! Sums income and expense amounts over any transaction set. Every
//! higher-level calculation builds on this.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::{Money, Transaction, TransactionType};

/// Income, expenses and their difference over a transaction set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub income: Money,
    pub expenses: Money,
    pub balance: Money,
}

impl BalanceResult {
    /// Build a result from its two sums
    pub fn new(income: Money, expenses: Money) -> Self {
        Self {
            income,
            expenses,
            balance: income - expenses,
        }
    }

    /// Whether nothing was counted
    pub fn is_empty(&self) -> bool {
        self.income.is_zero() && self.expenses.is_zero()
    }
}

/// Sum a transaction set by type
///
/// Accepts anything that yields borrowed transactions: a slice, a `Vec`, or
/// the subset returned by [`DateRange::filter`](super::window::DateRange::filter).
/// Unknown types are ignored and negative amounts count as zero.
pub fn calculate_balance<'a, I>(transactions: I) -> BalanceResult
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut income = Money::zero();
    let mut expenses = Money::zero();
    let mut counted = 0usize;

    for txn in transactions {
        match txn.transaction_type {
            TransactionType::Income => income += txn.effective_amount(),
            TransactionType::Expense => expenses += txn.effective_amount(),
            TransactionType::Unknown => continue,
        }
        counted += 1;
    }

    let result = BalanceResult::new(income, expenses);
    trace!(
        counted,
        income = %result.income,
        expenses = %result.expenses,
        "calculated balance"
    );
    result
}

/// Sum of a single type over a transaction set
pub fn total_of_type<'a, I>(transactions: I, transaction_type: TransactionType) -> Money
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| t.transaction_type == transaction_type)
        .map(Transaction::effective_amount)
        .sum()
}
