//! Test utilities for CSV storage tests.
//!
//! Each `TestEnvironment` owns a temporary directory that is removed when the
//! environment is dropped, even if the test panics.

use anyhow::Result;
use csv::WriterBuilder;
use shared::PatientRecord;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::CsvConnection;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    /// Write raw text to a file inside the data directory
    pub fn write_file(&self, file_name: &str, contents: &str) -> Result<()> {
        fs::write(self.base_path.join(file_name), contents)?;
        Ok(())
    }

    /// Write the receipts export, header row included
    pub fn write_receipts(&self, rows: &[&[&str]]) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_path(self.connection.receipts_file_path())?;
        for row in rows {
            writer.write_record(*row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Standalone patient with only the always-present fields filled in
pub fn sample_record(id: i64, name: &str) -> PatientRecord {
    PatientRecord {
        id,
        name: name.to_string(),
        sex: None,
        date_of_birth: None,
        phone_number: None,
        email: None,
        is_family_head: false,
        family_id: None,
        created_at: Some("2024-01-05T09:00:00+00:00".to_string()),
        next_appointment_date: None,
        hmo: None,
    }
}
