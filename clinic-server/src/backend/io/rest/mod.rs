//! # REST API Interface Layer
//!
//! HTTP endpoints for the clinic backend. Handlers log the request, hand it to
//! a domain service and translate the outcome into a status code:
//! validation errors are 400, missing records 404, a missing bearer token 401
//! and anything else 500.

pub mod mappers;
pub mod patient_apis;
pub mod revenue_apis;
pub mod session;

pub use patient_apis::*;
pub use revenue_apis::*;
pub use session::SessionContext;

use axum::http::StatusCode;

use crate::backend::domain::models::patient::PatientValidationError;
use crate::backend::domain::models::receipt::RevenueQueryError;

/// Status code for a failed service call
pub fn error_status(error: &anyhow::Error) -> StatusCode {
    if error.downcast_ref::<PatientValidationError>().is_some()
        || error.downcast_ref::<RevenueQueryError>().is_some()
    {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::RevenuePeriod;

    #[test]
    fn test_error_status() {
        let validation = anyhow::Error::from(PatientValidationError::EmptyName);
        let query = anyhow::Error::from(RevenueQueryError::MissingReference(RevenuePeriod::Day));
        let other = anyhow::anyhow!("disk on fire");

        assert_eq!(error_status(&validation), StatusCode::BAD_REQUEST);
        assert_eq!(error_status(&query), StatusCode::BAD_REQUEST);
        assert_eq!(error_status(&other), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
