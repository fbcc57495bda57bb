//! Category model
//!
//! A named grouping whose type matches the transactions it classifies. The
//! engine only ever sees the category key on a transaction; categories are
//! used by the presentation layer to show display names.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::lenient;
use super::transaction::TransactionType;

/// A transaction category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    #[serde(default)]
    pub id: CategoryId,

    /// Display name
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,

    /// Which kind of transactions this category classifies
    #[serde(rename = "type", default)]
    pub category_type: TransactionType,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>, category_type: TransactionType) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            category_type,
        }
    }

    /// Whether a transaction key refers to this category, by id or by name
    pub fn matches(&self, key: &str) -> bool {
        self.id.as_str() == key || self.name.eq_ignore_ascii_case(key)
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
