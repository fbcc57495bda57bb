//! Record model for fintrack
//!
//! The shapes of the transaction, category and budget records every
//! calculation consumes. Records are plain data; field-name variants and
//! loosely-typed values are normalised here, at the boundary, so the engine
//! only ever sees the canonical form.

pub mod budget;
pub mod category;
pub mod ids;
pub mod lenient;
pub mod money;
pub mod transaction;

pub use budget::{Budget, BudgetCadence, BudgetValidationError};
pub use category::Category;
pub use ids::{BudgetId, CategoryId, TransactionId};
pub use money::Money;
pub use transaction::{
    Transaction, TransactionType, TransactionValidationError, FALLBACK_CATEGORY,
};
