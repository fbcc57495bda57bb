//! Transaction model
//!
//! One money movement. The amount is always a non-negative magnitude; its
//! direction comes from the transaction type.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::ids::TransactionId;
use super::lenient;
use super::money::Money;

/// Grouping key used when a record has no usable category
pub const FALLBACK_CATEGORY: &str = "Other";

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
    /// Unrecognised type; ignored by every calculation
    #[default]
    Unknown,
}

impl TransactionType {
    /// Parse a type name case-insensitively, mapping anything else to `Unknown`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "income" => Self::Income,
            "expense" | "expenses" => Self::Expense,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient::opt_string(deserializer)?
            .map(|name| Self::from_name(&name))
            .unwrap_or_default())
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = TransactionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_name(s) {
            Self::Unknown => Err(TransactionValidationError::UnknownType(s.to_string())),
            known => Ok(known),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTransaction")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Income or expense
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Non-negative amount in currency units
    pub amount: Money,

    /// Category identifier or display name; an opaque grouping key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// When the money moved; `None` if missing or unreadable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,

    /// Free text, not used by calculations
    pub description: String,
}

/// A transaction as found in a snapshot, one field per accepted spelling
///
/// Older records mix `category` and `categoryId`, sometimes both on the same
/// record, so each spelling gets its own slot and they are merged in order.
#[derive(Deserialize)]
struct RawTransaction {
    #[serde(default)]
    id: TransactionId,
    #[serde(rename = "type", default)]
    kind: Option<TransactionType>,
    #[serde(rename = "transactionType", default)]
    kind_camel: Option<TransactionType>,
    #[serde(rename = "transaction_type", default)]
    kind_snake: Option<TransactionType>,
    #[serde(default)]
    amount: Money,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    category: Option<String>,
    #[serde(rename = "categoryId", default, deserialize_with = "lenient::opt_string")]
    category_camel: Option<String>,
    #[serde(rename = "category_id", default, deserialize_with = "lenient::opt_string")]
    category_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::string")]
    description: String,
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        let transaction_type = [raw.kind, raw.kind_camel, raw.kind_snake]
            .into_iter()
            .flatten()
            .find(|kind| *kind != TransactionType::Unknown)
            .unwrap_or_default();

        Self {
            id: raw.id,
            transaction_type,
            amount: raw.amount,
            category: raw.category.or(raw.category_camel).or(raw.category_snake),
            date: raw.date,
            description: raw.description,
        }
    }
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        transaction_type: TransactionType,
        amount: Money,
        category: impl Into<String>,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            transaction_type,
            amount,
            category: Some(category.into()),
            date: Some(date),
            description: String::new(),
        }
    }

    /// Create an income transaction dated at midnight
    pub fn income(amount: Money, category: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(
            TransactionType::Income,
            amount,
            category,
            date.and_time(NaiveTime::MIN),
        )
    }

    /// Create an expense transaction dated at midnight
    pub fn expense(amount: Money, category: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(
            TransactionType::Expense,
            amount,
            category,
            date.and_time(NaiveTime::MIN),
        )
    }

    /// Check if this is an expense
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// The amount used by calculations: negative amounts violate the record
    /// contract and count as zero
    pub fn effective_amount(&self) -> Money {
        self.amount.max(Money::zero())
    }

    /// The grouping key, falling back to [`FALLBACK_CATEGORY`]
    pub fn category_key(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.trim().is_empty() => category,
            _ => FALLBACK_CATEGORY,
        }
    }

    /// Validate the record contract
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }

        if self.transaction_type == TransactionType::Unknown {
            return Err(TransactionValidationError::UnknownType(
                self.transaction_type.to_string(),
            ));
        }

        if self.date.is_none() {
            return Err(TransactionValidationError::MissingDate);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        write!(
            f,
            "{} {} {} {}",
            date,
            self.transaction_type,
            self.category_key(),
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    UnknownType(String),
    MissingDate,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Transaction amount cannot be negative: {}", amount)
            }
            Self::UnknownType(name) => write!(f, "Unknown transaction type: {}", name),
            Self::MissingDate => write!(f, "Transaction has no valid date"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn test_new_expense() {
        let txn = Transaction::expense(Money::from_cents(5000), "Food", jan(15));
        assert!(txn.is_expense());
        assert_ne!(txn.transaction_type, TransactionType::Income);
        assert_eq!(txn.category_key(), "Food");
        assert_eq!(txn.date.unwrap().date(), jan(15));
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_category_fallback() {
        let mut txn = Transaction::expense(Money::from_cents(100), "  ", jan(1));
        assert_eq!(txn.category_key(), FALLBACK_CATEGORY);
        txn.category = None;
        assert_eq!(txn.category_key(), FALLBACK_CATEGORY);
    }

    #[test]
    fn test_negative_amount_is_ignored() {
        let mut txn = Transaction::income(Money::from_cents(100), "Salary", jan(1));
        txn.amount = Money::from_cents(-100);
        assert_eq!(txn.effective_amount(), Money::zero());
        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::NegativeAmount(Money::from_cents(-100)))
        );
    }

    #[test]
    fn test_type_from_str() {
        assert_eq!("Income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!("EXPENSE".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_deserialize_canonical_record() {
        let json = r#"{
            "id": "t1",
            "type": "expense",
            "amount": 12.34,
            "category": "Food",
            "date": "2025-01-15T08:30:00Z",
            "description": "lunch"
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.id.as_str(), "t1");
        assert!(txn.is_expense());
        assert_eq!(txn.amount.cents(), 1234);
        assert_eq!(txn.category_key(), "Food");
        assert_eq!(txn.date.unwrap().hour(), 8);
        assert_eq!(txn.description, "lunch");
    }

    #[test]
    fn test_deserialize_tolerates_bad_fields() {
        let json = r#"{
            "type": "INCOME",
            "amount": "abc",
            "categoryId": 7,
            "date": "not a date",
            "extra": {"ignored": true}
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.transaction_type, TransactionType::Income);
        assert_eq!(txn.amount, Money::zero());
        assert_eq!(txn.category.as_deref(), Some("7"));
        assert!(txn.date.is_none());
        assert_eq!(txn.validate(), Err(TransactionValidationError::MissingDate));
    }

    #[test]
    fn test_deserialize_merges_field_spellings() {
        let json = r#"{
            "type": "expense",
            "amount": 50,
            "category": "Food",
            "categoryId": "c-food",
            "date": "2025-01-03"
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.category.as_deref(), Some("Food"));
        assert!(txn.validate().is_ok());

        let json = r#"{"transaction_type": "income", "category": "", "category_id": "c-pay"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.transaction_type, TransactionType::Income);
        assert_eq!(txn.category_key(), "c-pay");

        let json = r#"{"type": "transfer", "transactionType": "expense"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert!(txn.is_expense());
    }

    #[test]
    fn test_serialize_uses_canonical_names() {
        let txn = Transaction::expense(Money::from_cents(250), "Food", jan(2));
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "expense");
        assert_eq!(value["category"], "Food");
        assert!(value.get("categoryId").is_none());

        let back: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, txn);
    }

    #[test]
    fn test_deserialize_unknown_type() {
        let txn: Transaction = serde_json::from_str(r#"{"type": "transfer"}"#).unwrap();
        assert_eq!(txn.transaction_type, TransactionType::Unknown);
        assert!(txn.validate().is_err());
    }
}
