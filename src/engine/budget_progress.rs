//! Budget progress
//!
//! Derives spent, remaining and percentage for a budget from the current
//! transaction snapshot, and classifies the result into a status band.
//! Nothing computed here is ever stored on the budget itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::models::{Budget, BudgetId, Money, Transaction};

/// Percentage at or above which a budget is exceeded
pub const EXCEEDED_THRESHOLD: f64 = 100.0;
/// Percentage at or above which a budget is critical
pub const CRITICAL_THRESHOLD: f64 = 90.0;
/// Percentage at or above which a budget is near its limit
pub const WARNING_THRESHOLD: f64 = 80.0;
/// Percentage at or above which a budget needs attention
pub const CAUTION_THRESHOLD: f64 = 60.0;

/// Status band for a budget's usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Normal,
    Caution,
    Warning,
    Critical,
    Exceeded,
}

impl BudgetStatus {
    /// Classify a usage percentage; the first matching band wins
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= EXCEEDED_THRESHOLD {
            Self::Exceeded
        } else if percentage >= CRITICAL_THRESHOLD {
            Self::Critical
        } else if percentage >= WARNING_THRESHOLD {
            Self::Warning
        } else if percentage >= CAUTION_THRESHOLD {
            Self::Caution
        } else {
            Self::Normal
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Caution => write!(f, "caution"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
            Self::Exceeded => write!(f, "exceeded"),
        }
    }
}

/// Usage of one budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub budget_id: BudgetId,
    pub category: String,
    pub budget_amount: Money,
    /// Sum of in-category expenses dated inside the budget
    pub spent: Money,
    /// Never negative; overage shows as `percentage > 100`
    pub remaining: Money,
    pub percentage: f64,
    pub status: BudgetStatus,
    pub is_exceeded: bool,
    pub is_near_limit: bool,
    pub transaction_count: usize,
}

impl BudgetProgress {
    fn from_spent(budget: &Budget, spent: Money, transaction_count: usize) -> Self {
        let percentage = spent.percentage_of(budget.budget_amount);
        let status = BudgetStatus::from_percentage(percentage);

        Self {
            budget_id: budget.id.clone(),
            category: budget.category.clone(),
            budget_amount: budget.budget_amount,
            spent,
            remaining: (budget.budget_amount - spent).max(Money::zero()),
            percentage,
            status,
            is_exceeded: status == BudgetStatus::Exceeded,
            is_near_limit: percentage >= WARNING_THRESHOLD,
            transaction_count,
        }
    }

    /// Amount spent beyond the budget, zero when within it
    pub fn overage(&self) -> Money {
        (self.spent - self.budget_amount).max(Money::zero())
    }
}

/// Whether a transaction counts against a budget
fn counts_against(budget: &Budget, txn: &Transaction) -> bool {
    txn.is_expense()
        && txn.category_key() == budget.category
        && txn.date.is_some_and(|date| budget.covers(date))
}

/// Compute one budget's usage
///
/// Selects expenses whose category equals the budget's category and whose
/// date falls inside the budget's dates, end day inclusive. Undated
/// transactions never count.
pub fn calculate_budget_progress<'a, I>(budget: &Budget, transactions: I) -> BudgetProgress
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut spent = Money::zero();
    let mut count = 0;
    for txn in transactions
        .into_iter()
        .filter(|t| counts_against(budget, t))
    {
        spent += txn.effective_amount();
        count += 1;
    }

    let progress = BudgetProgress::from_spent(budget, spent, count);
    debug!(
        budget = %budget.id,
        category = %budget.category,
        spent = %progress.spent,
        percentage = progress.percentage,
        status = %progress.status,
        "calculated budget progress"
    );
    progress
}

/// Usage of every active budget, highest percentage first, then by category
pub fn calculate_all_budget_progress(
    budgets: &[Budget],
    transactions: &[Transaction],
) -> Vec<BudgetProgress> {
    let mut progress: Vec<BudgetProgress> = budgets
        .iter()
        .filter(|b| b.is_active)
        .map(|b| calculate_budget_progress(b, transactions))
        .collect();

    progress.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.category.cmp(&b.category))
    });
    progress
}

/// Totals across a set of budget progress results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub total_budgeted: Money,
    pub total_spent: Money,
    pub total_remaining: Money,
    pub budget_count: usize,
    pub normal_count: usize,
    pub caution_count: usize,
    pub warning_count: usize,
    pub critical_count: usize,
    pub exceeded_count: usize,
}

impl BudgetOverview {
    /// Summarize a set of progress results
    pub fn from_progress(progress: &[BudgetProgress]) -> Self {
        let mut overview = Self {
            budget_count: progress.len(),
            ..Self::default()
        };

        for p in progress {
            overview.total_budgeted += p.budget_amount;
            overview.total_spent += p.spent;
            overview.total_remaining += p.remaining;
            match p.status {
                BudgetStatus::Normal => overview.normal_count += 1,
                BudgetStatus::Caution => overview.caution_count += 1,
                BudgetStatus::Warning => overview.warning_count += 1,
                BudgetStatus::Critical => overview.critical_count += 1,
                BudgetStatus::Exceeded => overview.exceeded_count += 1,
            }
        }

        overview
    }

    /// Overall usage across all budgets
    pub fn percentage(&self) -> f64 {
        self.total_spent.percentage_of(self.total_budgeted)
    }

    /// Budgets at warning level or worse
    pub fn needs_attention(&self) -> usize {
        self.warning_count + self.critical_count + self.exceeded_count
    }
}
