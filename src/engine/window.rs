//! Time-window selector
//!
//! Canonical date ranges (today, this/last week, this/last month, the last
//! 30 days, this calendar or fiscal year, or a month N months back) computed
//! from an explicit reference instant. Nothing here reads the clock.
//!
//! Ranges are inclusive on both ends and end at 23:59:59.999 of their last
//! day. They are only ever used as a predicate to select the transactions
//! handed to the other calculations.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Transaction;

/// Milliseconds from midnight to 23:59:59.999
const END_OF_DAY_MILLIS: i64 = 86_399_999;

/// First instant of a day
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last instant of a day, truncated to milliseconds
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::milliseconds(END_OF_DAY_MILLIS)
}

/// Shift a (year, month) pair by a signed number of months
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month.clamp(1, 12) as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// First day of a calendar month
fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

/// Last day of a calendar month
fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = shift_month(year, month, 1);
    let first = first_of_month(year, month);
    first_of_month(next_year, next_month)
        .pred_opt()
        .filter(|last| *last >= first)
        .unwrap_or(first)
}

/// An inclusive span of time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Create a range from two instants
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whole days from `first` 00:00 through `last` 23:59:59.999
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self::new(start_of_day(first), end_of_day(last))
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        Self::month(date.year(), date.month())
    }

    /// A calendar month
    pub fn month(year: i32, month: u32) -> Self {
        Self::days(first_of_month(year, month), last_of_month(year, month))
    }

    /// First calendar day of the range
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Last calendar day of the range
    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }

    /// Whether an instant falls inside the range (both ends inclusive)
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Whether a transaction is dated inside the range; undated records never are
    pub fn includes(&self, transaction: &Transaction) -> bool {
        transaction.date.is_some_and(|date| self.contains(date))
    }

    /// The transactions dated inside the range, in input order
    ///
    /// Borrows from the input; the slice itself is never reordered.
    pub fn filter<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| self.includes(t)).collect()
    }

    /// Short label for a range that covers one calendar month (`Jan 2025`)
    pub fn label(&self) -> String {
        self.start.format("%b %Y").to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.first_day().format("%Y-%m-%d"),
            self.last_day().format("%Y-%m-%d")
        )
    }
}

/// A named window relative to a reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    Today,
    ThisWeek,
    LastWeek,
    ThisMonth,
    /// The full calendar month before the reference month
    LastMonth,
    /// The reference day and the 29 days before it
    Last30Days,
    ThisYear,
    /// Twelve months from the configured fiscal start month
    FiscalYear,
    /// The calendar month `n` months before the reference month
    MonthsAgo(u32),
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => write!(f, "today"),
            Self::ThisWeek => write!(f, "this-week"),
            Self::LastWeek => write!(f, "last-week"),
            Self::ThisMonth => write!(f, "this-month"),
            Self::LastMonth => write!(f, "last-month"),
            Self::Last30Days => write!(f, "last-30-days"),
            Self::ThisYear => write!(f, "this-year"),
            Self::FiscalYear => write!(f, "fiscal-year"),
            Self::MonthsAgo(n) => write!(f, "months-ago:{}", n),
        }
    }
}

impl FromStr for TimeWindow {
    type Err = WindowParseError;

    /// Accepts kebab-case (`this-month`), camelCase (`thisMonth`) and
    /// `months-ago:N`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        if let Some(count) = normalized.strip_prefix("monthsago:") {
            return count
                .trim()
                .parse()
                .map(Self::MonthsAgo)
                .map_err(|_| WindowParseError::InvalidMonthCount(count.to_string()));
        }

        match normalized.as_str() {
            "today" => Ok(Self::Today),
            "thisweek" => Ok(Self::ThisWeek),
            "lastweek" => Ok(Self::LastWeek),
            "thismonth" => Ok(Self::ThisMonth),
            "lastmonth" => Ok(Self::LastMonth),
            "last30days" => Ok(Self::Last30Days),
            "thisyear" => Ok(Self::ThisYear),
            "fiscalyear" => Ok(Self::FiscalYear),
            _ => Err(WindowParseError::UnknownWindow(s.to_string())),
        }
    }
}

/// Error type for window parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowParseError {
    UnknownWindow(String),
    InvalidMonthCount(String),
}

impl fmt::Display for WindowParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownWindow(s) => write!(f, "Unknown time window: {}", s),
            Self::InvalidMonthCount(s) => write!(f, "Invalid month count: {}", s),
        }
    }
}

impl std::error::Error for WindowParseError {}

/// Computes window ranges for a given week start and fiscal year start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSelector {
    pub week_start: Weekday,
    /// 1 = January
    pub fiscal_year_start_month: u32,
}

impl Default for WindowSelector {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
            fiscal_year_start_month: 1,
        }
    }
}

impl WindowSelector {
    /// Resolve a window against a reference instant
    pub fn range(&self, window: TimeWindow, reference: NaiveDateTime) -> DateRange {
        let today = reference.date();
        match window {
            TimeWindow::Today => DateRange::days(today, today),
            TimeWindow::ThisWeek => self.week_containing(today),
            TimeWindow::LastWeek => self.week_containing(today - Duration::days(7)),
            TimeWindow::ThisMonth => DateRange::month_of(today),
            TimeWindow::LastMonth => months_ago(today, 1),
            TimeWindow::Last30Days => DateRange::days(today - Duration::days(29), today),
            TimeWindow::ThisYear => DateRange::days(
                first_of_month(today.year(), 1),
                last_of_month(today.year(), 12),
            ),
            TimeWindow::FiscalYear => self.fiscal_year_containing(today),
            TimeWindow::MonthsAgo(n) => months_ago(today, n),
        }
    }

    fn week_containing(&self, date: NaiveDate) -> DateRange {
        let offset = (date.weekday().num_days_from_monday() + 7
            - self.week_start.num_days_from_monday())
            % 7;
        let first = date - Duration::days(i64::from(offset));
        DateRange::days(first, first + Duration::days(6))
    }

    fn fiscal_year_containing(&self, date: NaiveDate) -> DateRange {
        let start_month = self.fiscal_year_start_month.clamp(1, 12);
        let start_year = if date.month() >= start_month {
            date.year()
        } else {
            date.year() - 1
        };
        let (end_year, end_month) = shift_month(start_year, start_month, 11);
        DateRange::days(
            first_of_month(start_year, start_month),
            last_of_month(end_year, end_month),
        )
    }
}

/// The calendar month `n` months before the month containing `date`
pub fn months_ago(date: NaiveDate, n: u32) -> DateRange {
    let delta = -(i32::try_from(n).unwrap_or(i32::MAX));
    let (year, month) = shift_month(date.year(), date.month(), delta);
    DateRange::month(year, month)
}

/// Resolve a window with a Sunday week start and a January fiscal year
pub fn get_date_range(window: TimeWindow, reference: NaiveDateTime) -> DateRange {
    WindowSelector::default().range(window, reference)
}
