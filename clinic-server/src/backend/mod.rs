//! # Backend Module
//!
//! Contains all non-UI logic for the dental clinic service.
//!
//! The backend follows a layered architecture:
//! ```text
//! HTTP clients
//!     ↓
//! IO Layer (REST API, session, mappers)
//!     ↓
//! Domain Layer (family directory, revenue reports)
//!     ↓
//! Storage Layer (CSV record store)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::backend::domain::{PatientService, RevenueService};
use crate::backend::storage::CsvConnection;
use crate::config::AppConfig;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService<CsvConnection>,
    pub revenue_service: RevenueService<CsvConnection>,
}

impl AppState {
    pub fn new(connection: CsvConnection) -> Self {
        let connection = Arc::new(connection);
        AppState {
            patient_service: PatientService::new(connection.clone()),
            revenue_service: RevenueService::new(connection),
        }
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!(
        "Setting up record store: patients={}, receipts={}",
        config.patients_path().display(),
        config.receipts_path().display()
    );
    let connection = CsvConnection::from_config(config)?;

    info!("Setting up application state");
    Ok(AppState::new(connection))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, allowed_origin: &str) -> Result<Router> {
    let origin = allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid allowed origin '{}'", allowed_origin))?;

    // CORS setup to allow the frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/patients", get(io::list_patients).post(io::create_patient))
        .route("/patients/families", get(io::list_family_groups))
        .route("/patients/:patient_id", get(io::get_patient))
        .route("/revenue", get(io::get_revenue_report))
        .route("/revenue/aggregate", post(io::aggregate_revenue));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}
