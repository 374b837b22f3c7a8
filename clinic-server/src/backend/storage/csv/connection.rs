use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;

use super::patient_repository::PatientRepository;
use super::receipt_repository::ReceiptRepository;
use crate::backend::storage::traits::Connection;
use crate::config::AppConfig;

/// CsvConnection knows where the record files live inside the data directory
#[derive(Clone, Debug)]
pub struct CsvConnection {
    base_directory: PathBuf,
    patients_file: String,
    receipts_file: String,
    /// Shared by every clone; serializes read-modify-write cycles on the files
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with the default file names
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        Self::with_file_names(base_directory, "patients.csv", "receipts.csv")
    }

    pub fn with_file_names<P: AsRef<Path>>(
        base_directory: P,
        patients_file: &str,
        receipts_file: &str,
    ) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            patients_file: patients_file.to_string(),
            receipts_file: receipts_file.to_string(),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::with_file_names(&config.data_directory, &config.patients_file, &config.receipts_file)
    }

    pub fn patients_file_path(&self) -> PathBuf {
        self.base_directory.join(&self.patients_file)
    }

    pub fn receipts_file_path(&self) -> PathBuf {
        self.base_directory.join(&self.receipts_file)
    }

    pub fn write_lock(&self) -> &Mutex<()> {
        &self.write_lock
    }
}

impl Connection for CsvConnection {
    type PatientRepository = PatientRepository;
    type ReceiptRepository = ReceiptRepository;

    fn create_patient_repository(&self) -> Self::PatientRepository {
        PatientRepository::new(self.clone())
    }

    fn create_receipt_repository(&self) -> Self::ReceiptRepository {
        ReceiptRepository::new(self.clone())
    }
}
