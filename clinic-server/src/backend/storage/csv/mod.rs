//! # CSV Storage
//!
//! Flat-file record store. Patients live in `patients.csv`, and the revenue
//! export is read from `receipts.csv`, both inside the configured data
//! directory.

pub mod connection;
pub mod patient_repository;
pub mod receipt_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use patient_repository::PatientRepository;
pub use receipt_repository::ReceiptRepository;
