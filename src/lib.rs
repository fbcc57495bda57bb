//! fintrack - personal finance calculations from the command line
//!
//! This library turns a snapshot of transactions, budgets and categories
//! into balances, category breakdowns, budget progress, monthly trends,
//! descriptive statistics, a financial health score and simple projections.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Record shapes and the `Money` type
//! - `engine`: Pure calculation functions over borrowed records
//! - `reports`: The combined dashboard report
//! - `storage`: Snapshot loading and JSON file helpers
//! - `config`: Configuration and path management
//! - `display`: Table rendering for terminal output
//! - `export`: CSV and JSON output
//! - `cli`: Command handlers used by the binary
//! - `logging`: `tracing` subscriber setup
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::engine::{calculate_balance, get_date_range, TimeWindow};
//! use fintrack::storage::Snapshot;
//!
//! let (snapshot, _report) = Snapshot::load("snapshot.json")?;
//! let range = get_date_range(TimeWindow::ThisMonth, reference);
//! let balance = calculate_balance(range.filter(&snapshot.transactions));
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod storage;

pub use error::{FintrackError, FintrackResult};
