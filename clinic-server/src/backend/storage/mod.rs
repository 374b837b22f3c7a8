//! # Storage Module
//!
//! The record store the domain layer reads from. Domain services only see the
//! traits in [`traits`]; the CSV implementation is one concrete backend.

pub mod csv;
pub mod traits;

pub use self::csv::CsvConnection;
pub use traits::*;
