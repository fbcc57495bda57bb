//! Display formatting for terminal output
//!
//! Formatting helpers for amounts and percentages, and `tabled` renderers
//! for every engine result.

pub mod report;
pub mod tables;

pub use report::{
    format_bar, format_change, format_date, format_money, format_percentage, truncate,
};
pub use tables::{
    render_balance, render_breakdown, render_budgets, render_category_trends, render_dashboard,
    render_health, render_projection, render_statistics, render_trends, DisplayOptions,
};
