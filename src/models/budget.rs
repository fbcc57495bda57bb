//! Budget model
//!
//! A spending cap for one category over one period. Spent, remaining and
//! percentage are never stored here; they are derived at read time from the
//! current transaction snapshot by the budget progress engine.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::lenient;
use super::money::Money;

/// How often a budget's cap resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCadence {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetCadence {
    /// Parse a cadence name, defaulting to monthly for anything unrecognised
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Self::Weekly,
            "yearly" | "year" | "annual" | "annually" => Self::Yearly,
            _ => Self::Monthly,
        }
    }
}

impl<'de> Deserialize<'de> for BudgetCadence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient::opt_string(deserializer)?
            .map(|name| Self::from_name(&name))
            .unwrap_or_default())
    }
}

impl fmt::Display for BudgetCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// A spending cap for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawBudget")]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// Category key, matched against `Transaction::category`
    pub category: String,

    /// The cap for the period
    pub budget_amount: Money,

    /// How often the cap resets
    pub period: BudgetCadence,

    /// First day covered (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    /// Last day covered (inclusive, through end of day)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Inactive budgets are skipped by aggregate views
    pub is_active: bool,
}

/// A budget as found in a snapshot, one field per accepted spelling
#[derive(Deserialize)]
struct RawBudget {
    #[serde(default)]
    id: BudgetId,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    category: Option<String>,
    #[serde(rename = "categoryId", default, deserialize_with = "lenient::opt_string")]
    category_camel: Option<String>,
    #[serde(rename = "category_id", default, deserialize_with = "lenient::opt_string")]
    category_snake: Option<String>,
    #[serde(rename = "budgetAmount", default)]
    budget_amount: Option<Money>,
    #[serde(rename = "budget_amount", default)]
    budget_amount_snake: Option<Money>,
    #[serde(default)]
    amount: Option<Money>,
    #[serde(default)]
    period: BudgetCadence,
    #[serde(rename = "startDate", default, deserialize_with = "lenient::opt_date")]
    start_date: Option<NaiveDate>,
    #[serde(rename = "start_date", default, deserialize_with = "lenient::opt_date")]
    start_date_snake: Option<NaiveDate>,
    #[serde(rename = "endDate", default, deserialize_with = "lenient::opt_date")]
    end_date: Option<NaiveDate>,
    #[serde(rename = "end_date", default, deserialize_with = "lenient::opt_date")]
    end_date_snake: Option<NaiveDate>,
    #[serde(rename = "isActive", default, deserialize_with = "lenient::opt_flag")]
    is_active: Option<bool>,
    #[serde(rename = "is_active", default, deserialize_with = "lenient::opt_flag")]
    is_active_snake: Option<bool>,
}

impl From<RawBudget> for Budget {
    fn from(raw: RawBudget) -> Self {
        Self {
            id: raw.id,
            category: raw
                .category
                .or(raw.category_camel)
                .or(raw.category_snake)
                .unwrap_or_default(),
            budget_amount: raw
                .budget_amount
                .or(raw.budget_amount_snake)
                .or(raw.amount)
                .unwrap_or_default(),
            period: raw.period,
            start_date: raw.start_date.or(raw.start_date_snake),
            end_date: raw.end_date.or(raw.end_date_snake),
            is_active: raw.is_active.or(raw.is_active_snake).unwrap_or(true),
        }
    }
}

impl Budget {
    /// Create an active budget covering `start..=end`
    pub fn new(
        category: impl Into<String>,
        budget_amount: Money,
        period: BudgetCadence,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: BudgetId::new(),
            category: category.into(),
            budget_amount,
            period,
            start_date: Some(start),
            end_date: Some(end),
            is_active: true,
        }
    }

    /// First instant covered, if bounded
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        self.start_date.map(|d| d.and_time(NaiveTime::MIN))
    }

    /// Last instant covered (23:59:59.999 of the end date), if bounded
    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        self.end_date.and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
    }

    /// Whether an instant falls inside the budget's dates
    pub fn covers(&self, instant: NaiveDateTime) -> bool {
        self.starts_at().map_or(true, |start| instant >= start)
            && self.ends_at().map_or(true, |end| instant <= end)
    }

    /// Validate the record contract
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.budget_amount.is_positive() {
            return Err(BudgetValidationError::NonPositiveAmount(self.budget_amount));
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start >= end {
                return Err(BudgetValidationError::InvalidDateRange { start, end });
            }
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} budget: {}",
            self.category, self.period, self.budget_amount
        )
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NonPositiveAmount(Money),
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Budget amount must be positive, got {}", amount)
            }
            Self::InvalidDateRange { start, end } => {
                write!(f, "Budget start {} must be before end {}", start, end)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}
