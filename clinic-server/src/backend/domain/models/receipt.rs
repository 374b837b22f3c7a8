//! Domain model for receipt rows and revenue periods.

use chrono::{DateTime, Datelike, Duration, NaiveDate};
use shared::RevenuePeriod;

/// Literal the backend uses for a missing value
pub const MISSING_VALUE_SENTINEL: &str = "N/A";

/// One line of the revenue export, restated against named fields.
///
/// Both fields are kept as raw text; [`ReceiptRow::entry`] decides whether
/// the row takes part in aggregation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReceiptRow {
    pub date: Option<String>,
    pub amount: Option<String>,
}

/// A receipt row whose date and amount both parsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiptEntry {
    pub date: NaiveDate,
    pub amount: f64,
}

impl ReceiptRow {
    pub fn new(date: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            amount: Some(amount.into()),
        }
    }

    /// Parsed view of the row, or None when either field is absent, blank,
    /// the "N/A" sentinel, or unparseable. Non-finite amounts are rejected.
    pub fn entry(&self) -> Option<ReceiptEntry> {
        let date = present_value(self.date.as_deref())?;
        let amount = present_value(self.amount.as_deref())?;

        let date = parse_calendar_day(date)?;
        let amount = amount.parse::<f64>().ok().filter(|a| a.is_finite())?;

        Some(ReceiptEntry { date, amount })
    }
}

fn present_value(value: Option<&str>) -> Option<&str> {
    let value = value?.trim();
    if value.is_empty() || value == MISSING_VALUE_SENTINEL {
        None
    } else {
        Some(value)
    }
}

/// Parse a bare `YYYY-MM-DD` date or an RFC 3339 timestamp into a calendar day.
/// Timestamps keep the day of their own recorded offset.
pub fn parse_calendar_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RevenueQueryError {
    #[error("Unknown revenue period: '{0}'")]
    UnknownPeriod(String),
    #[error("A reference date is required for the {0} period")]
    MissingReference(RevenuePeriod),
    #[error("Invalid reference '{reference}' for the {period} period (expected {expected})")]
    InvalidReference {
        period: RevenuePeriod,
        reference: String,
        expected: &'static str,
    },
    #[error("Revenue total for the {0} period exceeds the representable range")]
    TotalOutOfRange(RevenuePeriod),
}

/// A revenue period anchored to its reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSelection {
    Day(NaiveDate),
    /// Any date inside the week; the week is derived from it
    Week(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
    All,
}

impl PeriodSelection {
    /// Build a selection from a period and its textual reference.
    ///
    /// - day / week: `YYYY-MM-DD` (or an RFC 3339 timestamp)
    /// - month: `YYYY-MM`, or a full date whose month is used
    /// - year: `YYYY`, or a year-month / full date whose year is used
    /// - all: reference ignored
    pub fn parse(period: RevenuePeriod, reference: Option<&str>) -> Result<Self, RevenueQueryError> {
        if period == RevenuePeriod::All {
            return Ok(PeriodSelection::All);
        }

        let reference = reference
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(RevenueQueryError::MissingReference(period))?;

        let invalid = |expected: &'static str| RevenueQueryError::InvalidReference {
            period,
            reference: reference.to_string(),
            expected,
        };

        match period {
            RevenuePeriod::Day => parse_calendar_day(reference)
                .map(PeriodSelection::Day)
                .ok_or_else(|| invalid("YYYY-MM-DD")),
            RevenuePeriod::Week => parse_calendar_day(reference)
                .map(PeriodSelection::Week)
                .ok_or_else(|| invalid("YYYY-MM-DD")),
            RevenuePeriod::Month => parse_year_month(reference)
                .map(|(year, month)| PeriodSelection::Month { year, month })
                .ok_or_else(|| invalid("YYYY-MM")),
            RevenuePeriod::Year => parse_year(reference)
                .map(PeriodSelection::Year)
                .ok_or_else(|| invalid("YYYY")),
            RevenuePeriod::All => Ok(PeriodSelection::All),
        }
    }

    /// Selection anchored to `today`, used when the caller gives no reference
    pub fn anchored_at(period: RevenuePeriod, today: NaiveDate) -> Self {
        match period {
            RevenuePeriod::Day => PeriodSelection::Day(today),
            RevenuePeriod::Week => PeriodSelection::Week(today),
            RevenuePeriod::Month => PeriodSelection::Month {
                year: today.year(),
                month: today.month(),
            },
            RevenuePeriod::Year => PeriodSelection::Year(today.year()),
            RevenuePeriod::All => PeriodSelection::All,
        }
    }

    pub fn period(&self) -> RevenuePeriod {
        match self {
            PeriodSelection::Day(_) => RevenuePeriod::Day,
            PeriodSelection::Week(_) => RevenuePeriod::Week,
            PeriodSelection::Month { .. } => RevenuePeriod::Month,
            PeriodSelection::Year(_) => RevenuePeriod::Year,
            PeriodSelection::All => RevenuePeriod::All,
        }
    }

    /// Normalized reference text, None for `all`
    pub fn reference(&self) -> Option<String> {
        match self {
            PeriodSelection::Day(date) | PeriodSelection::Week(date) => {
                Some(date.format("%Y-%m-%d").to_string())
            }
            PeriodSelection::Month { year, month } => Some(format!("{:04}-{:02}", year, month)),
            PeriodSelection::Year(year) => Some(format!("{:04}", year)),
            PeriodSelection::All => None,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            PeriodSelection::Day(reference) => date == reference,
            PeriodSelection::Week(reference) => week_start(date) == week_start(reference),
            PeriodSelection::Month { year, month } => date.year() == year && date.month() == month,
            PeriodSelection::Year(year) => date.year() == year,
            PeriodSelection::All => true,
        }
    }
}

fn parse_year_month(value: &str) -> Option<(i32, u32)> {
    if let Some(date) = parse_calendar_day(value) {
        return Some((date.year(), date.month()));
    }
    let (year, month) = value.split_once('-')?;
    let year = parse_year_digits(year)?;
    let month = month.parse::<u32>().ok().filter(|m| (1..=12).contains(m))?;
    Some((year, month))
}

fn parse_year(value: &str) -> Option<i32> {
    if let Some((year, _)) = parse_year_month(value) {
        return Some(year);
    }
    parse_year_digits(value)
}

fn parse_year_digits(value: &str) -> Option<i32> {
    if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
        value.parse().ok()
    } else {
        None
    }
}
