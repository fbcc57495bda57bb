//! Reports built from engine results
//!
//! - Dashboard: the combined overview of a snapshot

pub mod dashboard;

pub use dashboard::{DashboardOptions, DashboardReport, DEFAULT_TOP_CATEGORIES};
