//! Patient registry service: loads patients from the record store, registers
//! new ones and builds the family directory.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::domain::commands::patient::{CreatePatientCommand, FamilyDirectoryResult};
use crate::backend::domain::family_directory::{DirectoryFilter, FamilyDirectoryService};
use crate::backend::domain::models::patient::{Patient, PatientCategory, PatientValidationError};
use crate::backend::io::rest::mappers::patient_mapper::PatientMapper;
use crate::backend::storage::{Connection, PatientStorage};

const MAX_NAME_LENGTH: usize = 100;

#[derive(Clone)]
pub struct PatientService<C: Connection> {
    patient_repository: C::PatientRepository,
    family_directory: FamilyDirectoryService,
}

impl<C: Connection> PatientService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            patient_repository: connection.create_patient_repository(),
            family_directory: FamilyDirectoryService::new(),
        }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>> {
        let records = self.patient_repository.list_patients().await?;
        Ok(records.into_iter().map(PatientMapper::to_domain).collect())
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<Option<Patient>> {
        let patient = self
            .patient_repository
            .get_patient(patient_id)
            .await?
            .map(PatientMapper::to_domain);

        if patient.is_none() {
            warn!("Patient not found: {}", patient_id);
        }
        Ok(patient)
    }

    /// Build the family directory from a fresh snapshot of the record store
    pub async fn list_family_groups(&self, filter: DirectoryFilter) -> Result<FamilyDirectoryResult> {
        let patients = self.list_patients().await?;

        let orphaned_member_ids: Vec<i64> = self
            .family_directory
            .orphaned_members(&patients)
            .iter()
            .map(|p| p.id)
            .collect();
        if !orphaned_member_ids.is_empty() {
            warn!(
                "{} member(s) reference an unknown family head and are hidden: {:?}",
                orphaned_member_ids.len(),
                orphaned_member_ids
            );
        }

        let groups = self.family_directory.group_patients(&patients, &filter);
        debug!(
            "Family directory: {} patients -> {} groups (search={:?}, date={:?}, role={})",
            patients.len(),
            groups.len(),
            filter.search_term,
            filter.selected_date,
            filter.viewer_role
        );

        Ok(FamilyDirectoryResult {
            groups,
            orphaned_member_ids,
        })
    }

    /// Register a new patient. The record store assigns the id, one past the
    /// highest id in use.
    pub async fn create_patient(&self, command: CreatePatientCommand) -> Result<Patient> {
        info!("Creating patient: name={}", command.name);

        let existing = self.list_patients().await?;
        self.validate_create_command(&command, &existing)?;

        let patient = Patient {
            id: 0,
            name: command.name.trim().to_string(),
            sex: trimmed(command.sex),
            date_of_birth: parse_optional_day(command.date_of_birth.as_deref()),
            phone_number: trimmed(command.phone_number),
            email: trimmed(command.email),
            is_family_head: command.is_family_head,
            family_id: command.family_id,
            created_at: Some(Utc::now().fixed_offset()),
            next_appointment_date: parse_optional_day(command.next_appointment_date.as_deref()),
            hmo: trimmed(command.hmo),
        };

        let stored = self
            .patient_repository
            .create_patient(PatientMapper::to_dto(patient))
            .await?;
        let patient = PatientMapper::to_domain(stored);

        info!("Created patient: {} with ID: {}", patient.name, patient.id);
        Ok(patient)
    }

    fn validate_create_command(
        &self,
        command: &CreatePatientCommand,
        existing: &[Patient],
    ) -> Result<(), PatientValidationError> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(PatientValidationError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(PatientValidationError::NameTooLong(MAX_NAME_LENGTH));
        }

        validate_day(command.date_of_birth.as_deref(), "Date of birth")?;
        validate_day(command.next_appointment_date.as_deref(), "Next appointment date")?;

        if let Some(email) = command.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            if !is_plausible_email(email) {
                return Err(PatientValidationError::InvalidEmail(email.to_string()));
            }
        }

        if let Some(family_id) = command.family_id {
            if command.is_family_head {
                return Err(PatientValidationError::HeadWithFamilyId);
            }
            let head_exists = existing
                .iter()
                .any(|p| p.id == family_id && p.category() == PatientCategory::FamilyHead);
            if !head_exists {
                return Err(PatientValidationError::UnknownFamilyHead(family_id));
            }
        }

        Ok(())
    }
}

/// Strict YYYY-MM-DD; blank counts as absent
fn validate_day(value: Option<&str>, field: &'static str) -> Result<(), PatientValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(()),
        Some(v) if v.len() == 10 && NaiveDate::parse_from_str(v, "%Y-%m-%d").is_ok() => Ok(()),
        Some(_) => Err(PatientValidationError::InvalidDate { field }),
    }
}

fn parse_optional_day(value: Option<&str>) -> Option<NaiveDate> {
    value
        .map(str::trim)
        .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
