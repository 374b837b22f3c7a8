//! # Domain Module
//!
//! Contains the business logic of the clinic backend.
//!
//! ## Module Organization
//!
//! - **family_directory**: Grouping patients into families and filtering the directory
//! - **revenue_report**: Summing receipt amounts over a calendar period
//! - **patient_service**: Patient registry backed by the record store
//! - **revenue_service**: Revenue reports over the stored receipts export
//! - **commands**: Internal command and query types used by the services
//!
//! ## Core Concepts
//!
//! - **Family head**: A patient flagged as the anchor of a family group
//! - **Member**: A patient whose `family_id` names a family head
//! - **Standalone**: Neither head nor member; forms a group of one
//! - **Period selection**: A day, Sunday-started week, month, year or all time
//!
//! ## Business Rules
//!
//! - Every patient appears in at most one group; members of unknown heads are hidden
//! - Search and date filters keep or drop whole groups
//! - Receipt rows with a missing, "N/A" or malformed date or amount never
//!   contribute to a revenue total

pub mod commands;
pub mod family_directory;
pub mod models;
pub mod patient_service;
pub mod revenue_report;
pub mod revenue_service;

pub use family_directory::{DirectoryFilter, FamilyDirectoryService};
pub use patient_service::PatientService;
pub use revenue_report::{RevenueReportService, RevenueSummary};
pub use revenue_service::RevenueService;
