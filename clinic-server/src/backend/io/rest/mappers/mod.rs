pub mod patient_mapper;
pub mod receipt_mapper;
