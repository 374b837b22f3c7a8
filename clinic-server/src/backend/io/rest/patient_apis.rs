//! # REST API for the Patient Directory
//!
//! Endpoints for listing, registering and grouping patients.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};

use super::mappers::patient_mapper::PatientMapper;
use super::{error_status, SessionContext};
use crate::backend::domain::commands::patient::CreatePatientCommand;
use crate::backend::domain::family_directory::DirectoryFilter;
use crate::backend::AppState;
use shared::{CreatePatientRequest, FamilyDirectoryResponse, PatientListResponse, PatientResponse};

// Query parameters for the family directory API
#[derive(Debug, Default, Deserialize)]
pub struct FamilyDirectoryQuery {
    pub search: Option<String>,
    /// Creation day, YYYY-MM-DD
    pub date: Option<String>,
}

/// List all patients
pub async fn list_patients(
    State(state): State<AppState>,
    session: SessionContext,
) -> impl IntoResponse {
    info!("GET /api/patients - role: {}", session.role);

    match state.patient_service.list_patients().await {
        Ok(patients) => {
            let response = PatientListResponse {
                patients: patients
                    .into_iter()
                    .map(|p| PatientMapper::to_dto_for_role(p, session.role))
                    .collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list patients: {}", e);
            (error_status(&e), "Error listing patients").into_response()
        }
    }
}

/// Get a patient by ID
pub async fn get_patient(
    State(state): State<AppState>,
    session: SessionContext,
    Path(patient_id): Path<i64>,
) -> impl IntoResponse {
    info!("GET /api/patients/{}", patient_id);

    match state.patient_service.get_patient(patient_id).await {
        Ok(Some(patient)) => {
            (StatusCode::OK, Json(PatientMapper::to_dto_for_role(patient, session.role))).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Patient not found").into_response(),
        Err(e) => {
            error!("Failed to get patient: {}", e);
            (error_status(&e), "Error retrieving patient").into_response()
        }
    }
}

/// Register a new patient
pub async fn create_patient(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<CreatePatientRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/patients - user: {:?}, name: {}",
        session.user_id, request.name
    );

    let command = CreatePatientCommand {
        name: request.name,
        sex: request.sex,
        date_of_birth: request.date_of_birth,
        phone_number: request.phone_number,
        email: request.email,
        is_family_head: request.is_family_head,
        family_id: request.family_id,
        next_appointment_date: request.next_appointment_date,
        hmo: request.hmo,
    };

    match state.patient_service.create_patient(command).await {
        Ok(patient) => {
            let response = PatientResponse {
                success_message: format!("Registered {} as patient #{}", patient.name, patient.id),
                patient: PatientMapper::to_dto_for_role(patient, session.role),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to create patient: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Family groups, filtered by search term and creation day
pub async fn list_family_groups(
    State(state): State<AppState>,
    session: SessionContext,
    Query(query): Query<FamilyDirectoryQuery>,
) -> impl IntoResponse {
    info!("GET /api/patients/families - query: {:?}, role: {}", query, session.role);

    let selected_date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                return (StatusCode::BAD_REQUEST, "date must be in YYYY-MM-DD format").into_response()
            }
        },
        None => None,
    };

    let filter = DirectoryFilter {
        search_term: query.search,
        selected_date,
        viewer_role: session.role,
    };

    match state.patient_service.list_family_groups(filter).await {
        Ok(result) => {
            let response = FamilyDirectoryResponse {
                total_patients: result.total_patients(),
                groups: result
                    .groups
                    .into_iter()
                    .map(|group| PatientMapper::to_family_group_dto(group, session.role))
                    .collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to build family directory: {}", e);
            (error_status(&e), "Error building family directory").into_response()
        }
    }
}
