//! Domain model for a patient and the family groups built from patients.

use chrono::{DateTime, FixedOffset, NaiveDate};

#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub sex: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub is_family_head: bool,
    pub family_id: Option<i64>,
    /// None when the stored timestamp is absent or malformed
    pub created_at: Option<DateTime<FixedOffset>>,
    pub next_appointment_date: Option<NaiveDate>,
    pub hmo: Option<String>,
}

/// Where a patient sits in the family hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientCategory {
    FamilyHead,
    /// Member of the family whose head has the given id
    FamilyMember(i64),
    Standalone,
}

impl Patient {
    /// The head flag wins over a stray family id.
    pub fn category(&self) -> PatientCategory {
        if self.is_family_head {
            PatientCategory::FamilyHead
        } else if let Some(family_id) = self.family_id {
            PatientCategory::FamilyMember(family_id)
        } else {
            PatientCategory::Standalone
        }
    }

    /// Calendar day the record was created, in the timestamp's own offset
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.map(|created_at| created_at.date_naive())
    }
}

/// A family head or standalone patient with its ordered members
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyGroup {
    pub head: Patient,
    pub members: Vec<Patient>,
}

impl FamilyGroup {
    pub fn new(head: Patient) -> Self {
        Self {
            head,
            members: Vec::new(),
        }
    }

    /// Head followed by members
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        std::iter::once(&self.head).chain(self.members.iter())
    }

    /// Number of records represented by this group
    pub fn len(&self) -> usize {
        1 + self.members.len()
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PatientValidationError {
    #[error("Patient name cannot be empty")]
    EmptyName,
    #[error("Patient name cannot exceed {0} characters")]
    NameTooLong(usize),
    #[error("{field} must be in YYYY-MM-DD format")]
    InvalidDate { field: &'static str },
    #[error("Email address '{0}' is not valid")]
    InvalidEmail(String),
    #[error("A family head cannot belong to another family")]
    HeadWithFamilyId,
    #[error("Family head {0} does not exist")]
    UnknownFamilyHead(i64),
}
