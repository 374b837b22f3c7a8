use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::ReaderBuilder;
use tracing::debug;

use super::connection::CsvConnection;
use crate::backend::storage::ReceiptStorage;

/// Read-only access to the revenue export (receipts.csv)
#[derive(Clone)]
pub struct ReceiptRepository {
    connection: CsvConnection,
}

impl ReceiptRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_rows(&self) -> Result<Vec<Vec<String>>> {
        let file_path = self.connection.receipts_file_path();
        if !file_path.exists() {
            debug!("Receipts file {} doesn't exist yet", file_path.display());
            return Ok(Vec::new());
        }

        // The header is handed to the caller as the first row, and rows are
        // allowed to be ragged; short rows simply lack the trailing columns
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result.with_context(|| format!("Failed to read {}", file_path.display()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(rows)
    }
}

#[async_trait]
impl ReceiptStorage for ReceiptRepository {
    async fn list_receipt_rows(&self) -> Result<Vec<Vec<String>>> {
        let rows = self.read_rows()?;
        debug!("Loaded {} receipt rows (including header)", rows.len());
        Ok(rows)
    }
}
