//! Revenue service: loads the receipts export and aggregates it per period.

use anyhow::Result;
use chrono::Local;
use serde_json::Value;
use shared::RevenuePeriod;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::commands::revenue::RevenueReportQuery;
use crate::backend::domain::models::receipt::{PeriodSelection, ReceiptRow, RevenueQueryError};
use crate::backend::domain::revenue_report::{RevenueReportService, RevenueSummary};
use crate::backend::io::rest::mappers::receipt_mapper::ReceiptMapper;
use crate::backend::storage::{Connection, ReceiptStorage};

#[derive(Clone)]
pub struct RevenueService<C: Connection> {
    receipt_repository: C::ReceiptRepository,
    report_service: RevenueReportService,
}

impl<C: Connection> RevenueService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            receipt_repository: connection.create_receipt_repository(),
            report_service: RevenueReportService::new(),
        }
    }

    /// Report over the stored receipts export
    pub async fn report_for_period(&self, query: RevenueReportQuery) -> Result<RevenueSummary> {
        info!(
            "Revenue report: period={}, reference={:?}",
            query.period, query.reference
        );

        let selection = self.resolve_selection(query.period, query.reference.as_deref())?;
        let table = self.receipt_repository.list_receipt_rows().await?;
        let rows = ReceiptMapper::from_string_table(&table);

        self.summarize(&rows, &selection)
    }

    /// Report over a caller-supplied table (header row first)
    pub fn report_for_table(
        &self,
        period: RevenuePeriod,
        reference: Option<&str>,
        table: &[Vec<Value>],
    ) -> Result<RevenueSummary> {
        let selection = self.resolve_selection(period, reference)?;
        let rows = ReceiptMapper::from_json_table(table);

        self.summarize(&rows, &selection)
    }

    /// A blank or missing reference anchors the period to today
    pub fn resolve_selection(
        &self,
        period: RevenuePeriod,
        reference: Option<&str>,
    ) -> Result<PeriodSelection, RevenueQueryError> {
        match reference.map(str::trim).filter(|r| !r.is_empty()) {
            Some(reference) => PeriodSelection::parse(period, Some(reference)),
            None => Ok(PeriodSelection::anchored_at(period, Local::now().date_naive())),
        }
    }

    /// Finite amounts can still overflow to infinity, which JSON cannot carry
    fn summarize(&self, rows: &[ReceiptRow], selection: &PeriodSelection) -> Result<RevenueSummary> {
        let summary = self.report_service.summarize(rows, selection);
        if !summary.total.is_finite() {
            return Err(RevenueQueryError::TotalOutOfRange(selection.period()).into());
        }
        if summary.skipped_rows > 0 {
            warn!(
                "Skipped {} receipt row(s) with a missing or malformed date or amount",
                summary.skipped_rows
            );
        }
        info!(
            "Revenue for {} {:?}: {} over {} row(s)",
            selection.period(),
            selection.reference(),
            summary.total,
            summary.included_rows
        );
        Ok(summary)
    }
}
