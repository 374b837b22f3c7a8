//! # Storage Traits
//!
//! This module defines the record store abstraction that the domain layer
//! reads patients and receipts through, so different storage backends can be
//! used interchangeably.

use anyhow::Result;
use async_trait::async_trait;
use shared::PatientRecord;

/// Trait defining the interface for patient storage operations
///
/// Records are exchanged in their wire shape; parsing into domain types
/// happens in the mappers.
#[async_trait]
pub trait PatientStorage: Send + Sync {
    /// Store a new patient. Fails if the id is already taken.
    async fn store_patient(&self, patient: &PatientRecord) -> Result<()>;

    /// Store a new patient under the next free id and return it with that id.
    /// The id on `patient` is ignored.
    async fn create_patient(&self, patient: PatientRecord) -> Result<PatientRecord>;

    /// Retrieve a specific patient by ID
    async fn get_patient(&self, patient_id: i64) -> Result<Option<PatientRecord>>;

    /// List all patients in storage order
    async fn list_patients(&self) -> Result<Vec<PatientRecord>>;
}

/// Trait defining the interface for the revenue export
#[async_trait]
pub trait ReceiptStorage: Send + Sync {
    /// Raw receipt table: the header row first, then one positional row per
    /// receipt. Rows may have different lengths.
    async fn list_receipt_rows(&self) -> Result<Vec<Vec<String>>>;
}

/// Trait defining the interface for storage connections
///
/// Provides factory methods for creating repositories so the domain layer can
/// work with any storage backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    type PatientRepository: PatientStorage + Clone;
    type ReceiptRepository: ReceiptStorage + Clone;

    fn create_patient_repository(&self) -> Self::PatientRepository;

    fn create_receipt_repository(&self) -> Self::ReceiptRepository;
}
