pub mod patient;
pub mod receipt;
