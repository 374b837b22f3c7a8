//! Revenue report domain logic.
//!
//! Sums receipt amounts over a day, week, month, year or all time. Rows with a
//! missing, "N/A" or unparseable date or amount are skipped rather than
//! failing the whole report; the summary counts how many were skipped.

use crate::backend::domain::models::receipt::{PeriodSelection, ReceiptRow};

/// Result of aggregating receipt rows over a period
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueSummary {
    pub selection: PeriodSelection,
    pub total: f64,
    pub included_rows: usize,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RevenueReportService;

impl RevenueReportService {
    pub fn new() -> Self {
        Self
    }

    /// Total amount of the valid rows inside `selection`
    pub fn total_for_period(&self, rows: &[ReceiptRow], selection: &PeriodSelection) -> f64 {
        self.summarize(rows, selection).total
    }

    pub fn summarize(&self, rows: &[ReceiptRow], selection: &PeriodSelection) -> RevenueSummary {
        let mut summary = RevenueSummary {
            selection: *selection,
            total: 0.0,
            included_rows: 0,
            skipped_rows: 0,
        };

        for row in rows {
            match row.entry() {
                Some(entry) if selection.contains(entry.date) => {
                    summary.total += entry.amount;
                    summary.included_rows += 1;
                }
                Some(_) => {}
                None => summary.skipped_rows += 1,
            }
        }

        summary
    }
}
