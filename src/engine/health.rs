//! Financial health scoring
//!
//! Combines balance, income, spending, emergency-fund and budgeting signals
//! into a 0-100 score, a letter grade and a short, ordered list of
//! recommendations.
//!
//! The caller chooses which transactions to score (typically the last full
//! month). Last month's expenses, used by the emergency-fund check, and
//! budget usage are always read from the full history, so narrowing the
//! scored window cannot hide them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::balance::calculate_balance;
use super::budget_progress::calculate_all_budget_progress;
use super::window::{get_date_range, TimeWindow};
use crate::models::{Budget, Money, Transaction, TransactionType};

/// Recommendations returned at most
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Months of expenses the balance must exceed to count as an emergency fund
pub const EMERGENCY_FUND_MONTHS: f64 = 3.0;

/// Savings rate below which saving more is recommended
pub const TARGET_SAVINGS_RATE: f64 = 20.0;

/// Budget utilization above which reviewing budgets is recommended
pub const HIGH_UTILIZATION: f64 = 90.0;

/// Letter grade for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        write!(f, "{}", letter)
    }
}

/// One scored check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthCheck {
    PositiveBalance,
    HasIncome,
    SpendingBelowIncome,
    EmergencyFund,
    HasBudget,
}

impl HealthCheck {
    /// Every check, in scoring order
    pub const ALL: [HealthCheck; 5] = [
        Self::PositiveBalance,
        Self::HasIncome,
        Self::SpendingBelowIncome,
        Self::EmergencyFund,
        Self::HasBudget,
    ];

    /// Points awarded when the check passes
    pub const fn points(self) -> u32 {
        match self {
            Self::PositiveBalance => 20,
            Self::HasIncome => 20,
            Self::SpendingBelowIncome => 30,
            Self::EmergencyFund => 20,
            Self::HasBudget => 10,
        }
    }

    fn passes(self, factors: &HealthFactors) -> bool {
        match self {
            Self::PositiveBalance => factors.balance.is_positive(),
            Self::HasIncome => factors.income.is_positive(),
            Self::SpendingBelowIncome => factors.expenses < factors.income,
            Self::EmergencyFund => factors.has_emergency_fund,
            Self::HasBudget => factors.budget_count > 0,
        }
    }
}

impl fmt::Display for HealthCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PositiveBalance => write!(f, "Positive balance"),
            Self::HasIncome => write!(f, "Income recorded"),
            Self::SpendingBelowIncome => write!(f, "Spending below income"),
            Self::EmergencyFund => write!(f, "Emergency fund"),
            Self::HasBudget => write!(f, "Budget in place"),
        }
    }
}

/// Points earned for one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub check: HealthCheck,
    pub points: u32,
    pub max_points: u32,
}

impl ScoreComponent {
    pub fn passed(&self) -> bool {
        self.points == self.max_points
    }
}

/// Inputs the score is derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthFactors {
    pub income: Money,
    pub expenses: Money,
    pub balance: Money,
    /// `(income - expenses) / income * 100`, zero without income
    pub savings_rate: f64,
    /// Mean usage percentage of active budgets, zero without budgets
    pub budget_utilization: f64,
    /// Active budgets
    pub budget_count: usize,
    /// Expenses in the last full month before the reference instant
    pub last_month_expenses: Money,
    pub has_emergency_fund: bool,
}

/// What a recommendation asks for, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecommendationKind {
    StartEarning,
    ReduceSpending,
    RecoverNegativeBalance,
    CreateBudget,
    BuildEmergencyFund,
    IncreaseSavingsRate,
    ReviewBudgets,
}

impl RecommendationKind {
    /// Every kind, highest priority first
    pub const PRIORITY: [RecommendationKind; 7] = [
        Self::StartEarning,
        Self::ReduceSpending,
        Self::RecoverNegativeBalance,
        Self::CreateBudget,
        Self::BuildEmergencyFund,
        Self::IncreaseSavingsRate,
        Self::ReviewBudgets,
    ];

    fn applies(self, factors: &HealthFactors) -> bool {
        let has_income = factors.income.is_positive();
        match self {
            Self::StartEarning => !has_income,
            Self::ReduceSpending => has_income && factors.expenses >= factors.income,
            Self::RecoverNegativeBalance => factors.balance.is_negative(),
            Self::CreateBudget => factors.budget_count == 0,
            Self::BuildEmergencyFund => !factors.has_emergency_fund,
            Self::IncreaseSavingsRate => has_income && factors.savings_rate < TARGET_SAVINGS_RATE,
            Self::ReviewBudgets => factors.budget_utilization > HIGH_UTILIZATION,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::StartEarning => "Record a source of income to start building a positive balance.",
            Self::ReduceSpending => "Your expenses meet or exceed your income. Look for spending to cut.",
            Self::RecoverNegativeBalance => "Your balance is negative. Prioritize bringing it back above zero.",
            Self::CreateBudget => "Create a budget for your largest spending categories.",
            Self::BuildEmergencyFund => "Build an emergency fund covering at least three months of expenses.",
            Self::IncreaseSavingsRate => "Aim to save at least 20% of your income.",
            Self::ReviewBudgets => "Your budgets are nearly used up. Review your limits or spending.",
        }
    }
}

/// A human-readable suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
}

impl From<RecommendationKind> for Recommendation {
    fn from(kind: RecommendationKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Overall financial health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHealth {
    /// 0-100
    pub score: u32,
    pub grade: Grade,
    pub factors: HealthFactors,
    pub components: Vec<ScoreComponent>,
    /// At most [`MAX_RECOMMENDATIONS`], highest priority first
    pub recommendations: Vec<Recommendation>,
}

/// Percentage of income kept, zero without income
pub fn savings_rate(income: Money, expenses: Money) -> f64 {
    (income - expenses).percentage_of(income)
}

/// Score the supplied transactions and budgets, treating them as the whole history
pub fn calculate_financial_health_score(
    transactions: &[Transaction],
    budgets: &[Budget],
    reference: NaiveDateTime,
) -> FinancialHealth {
    calculate_windowed_health_score(transactions, transactions, budgets, reference)
}

/// Score `scored` (usually one window cut from `history`)
///
/// Income, spending, balance and savings rate come from `scored`. The
/// emergency-fund check compares that balance with the expenses of the last
/// full month before `reference` found in `history`, and budget usage is
/// measured against `history` as well.
pub fn calculate_windowed_health_score(
    scored: &[Transaction],
    history: &[Transaction],
    budgets: &[Budget],
    reference: NaiveDateTime,
) -> FinancialHealth {
    let totals = calculate_balance(scored);

    let last_month = get_date_range(TimeWindow::LastMonth, reference);
    let last_month_expenses: Money = last_month
        .filter(history)
        .into_iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
        .map(Transaction::effective_amount)
        .sum();

    let progress = calculate_all_budget_progress(budgets, history);
    let budget_utilization = if progress.is_empty() {
        0.0
    } else {
        progress.iter().map(|p| p.percentage).sum::<f64>() / progress.len() as f64
    };

    let factors = HealthFactors {
        income: totals.income,
        expenses: totals.expenses,
        balance: totals.balance,
        savings_rate: savings_rate(totals.income, totals.expenses),
        budget_utilization,
        budget_count: progress.len(),
        last_month_expenses,
        has_emergency_fund: totals.balance.to_f64()
            > last_month_expenses.to_f64() * EMERGENCY_FUND_MONTHS,
    };

    let components: Vec<ScoreComponent> = HealthCheck::ALL
        .iter()
        .map(|&check| ScoreComponent {
            check,
            points: if check.passes(&factors) { check.points() } else { 0 },
            max_points: check.points(),
        })
        .collect();

    let score = components.iter().map(|c| c.points).sum::<u32>().min(100);

    let recommendations: Vec<Recommendation> = RecommendationKind::PRIORITY
        .iter()
        .copied()
        .filter(|kind| kind.applies(&factors))
        .take(MAX_RECOMMENDATIONS)
        .map(Recommendation::from)
        .collect();

    debug!(
        score,
        savings_rate = factors.savings_rate,
        budget_utilization = factors.budget_utilization,
        recommendations = recommendations.len(),
        "calculated financial health"
    );

    FinancialHealth {
        score,
        grade: Grade::from_score(score),
        factors,
        components,
        recommendations,
    }
}
