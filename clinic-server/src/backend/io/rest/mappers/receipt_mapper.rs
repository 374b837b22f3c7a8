//! Conversions from the positional revenue export to named `ReceiptRow`s, and
//! from revenue summaries to response DTOs.
//!
//! Column positions of the export are only known here.

use serde_json::Value;
use shared::RevenueReportResponse;

use crate::backend::domain::models::receipt::ReceiptRow;
use crate::backend::domain::revenue_report::RevenueSummary;

/// Column holding the receipt date (ISO 8601)
pub const RECEIPT_DATE_COLUMN: usize = 0;
/// Column holding the receipt amount
pub const RECEIPT_AMOUNT_COLUMN: usize = 7;

pub struct ReceiptMapper;

impl ReceiptMapper {
    /// Map a string table (header row first) to receipt rows
    pub fn from_string_table(table: &[Vec<String>]) -> Vec<ReceiptRow> {
        table
            .iter()
            .skip(1)
            .map(|row| ReceiptRow {
                date: row.get(RECEIPT_DATE_COLUMN).cloned(),
                amount: row.get(RECEIPT_AMOUNT_COLUMN).cloned(),
            })
            .collect()
    }

    /// Map a loosely-typed JSON table (header row first) to receipt rows
    pub fn from_json_table(table: &[Vec<Value>]) -> Vec<ReceiptRow> {
        table
            .iter()
            .skip(1)
            .map(|row| ReceiptRow {
                date: row.get(RECEIPT_DATE_COLUMN).and_then(Self::json_cell),
                amount: row.get(RECEIPT_AMOUNT_COLUMN).and_then(Self::json_cell),
            })
            .collect()
    }

    /// Strings and numbers carry a value; null, booleans and nested values don't
    fn json_cell(value: &Value) -> Option<String> {
        match value {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    pub fn to_report_dto(summary: &RevenueSummary) -> RevenueReportResponse {
        RevenueReportResponse {
            period: summary.selection.period(),
            reference: summary.selection.reference(),
            total: summary.total,
            included_rows: summary.included_rows,
            skipped_rows: summary.skipped_rows,
        }
    }
}
