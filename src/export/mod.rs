//! Export of engine results
//!
//! - CSV: breakdowns, trend months and budget usage for spreadsheets
//! - JSON: any derived structure, for scripts

pub mod csv;
pub mod json;

pub use self::csv::{export_breakdown_csv, export_budget_progress_csv, export_trends_csv};
pub use self::json::export_json;
