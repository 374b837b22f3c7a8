//! Conversions between the wire-shaped `shared::PatientRecord` and the domain
//! `Patient`.

use chrono::{DateTime, FixedOffset, NaiveDate};
use shared::{FamilyGroup as SharedFamilyGroup, PatientRecord, ViewerRole};
use tracing::warn;

use crate::backend::domain::models::patient::{FamilyGroup, Patient};
use crate::backend::domain::models::receipt::parse_calendar_day;

pub struct PatientMapper;

impl PatientMapper {
    /// Parse a stored record into the domain model.
    ///
    /// Never fails: unparseable dates become None (with a warning) so the
    /// record still takes part in grouping. A malformed creation date simply
    /// never matches a date filter.
    pub fn to_domain(dto: PatientRecord) -> Patient {
        let created_at = dto
            .created_at
            .as_deref()
            .and_then(|value| Self::parse_timestamp(dto.id, "createdAt", value));
        let date_of_birth = dto
            .date_of_birth
            .as_deref()
            .and_then(|value| Self::parse_day(dto.id, "dateOfBirth", value));
        let next_appointment_date = dto
            .next_appointment_date
            .as_deref()
            .and_then(|value| Self::parse_day(dto.id, "nextAppointmentDate", value));

        Patient {
            id: dto.id,
            name: dto.name,
            sex: non_empty(dto.sex),
            date_of_birth,
            phone_number: non_empty(dto.phone_number),
            email: non_empty(dto.email),
            is_family_head: dto.is_family_head,
            family_id: dto.family_id,
            created_at,
            next_appointment_date,
            hmo: non_empty(dto.hmo),
        }
    }

    pub fn to_dto(domain: Patient) -> PatientRecord {
        PatientRecord {
            id: domain.id,
            name: domain.name,
            sex: domain.sex,
            date_of_birth: domain.date_of_birth.map(format_day),
            phone_number: domain.phone_number,
            email: domain.email,
            is_family_head: domain.is_family_head,
            family_id: domain.family_id,
            created_at: domain.created_at.map(|created_at| created_at.to_rfc3339()),
            next_appointment_date: domain.next_appointment_date.map(format_day),
            hmo: domain.hmo,
        }
    }

    /// Like `to_dto`, with phone and email removed for roles that may not see them
    pub fn to_dto_for_role(domain: Patient, viewer_role: ViewerRole) -> PatientRecord {
        let mut dto = Self::to_dto(domain);
        if !viewer_role.can_view_contact_details() {
            dto.phone_number = None;
            dto.email = None;
        }
        dto
    }

    pub fn to_family_group_dto(group: FamilyGroup, viewer_role: ViewerRole) -> SharedFamilyGroup {
        SharedFamilyGroup {
            head: Self::to_dto_for_role(group.head, viewer_role),
            members: group
                .members
                .into_iter()
                .map(|member| Self::to_dto_for_role(member, viewer_role))
                .collect(),
        }
    }

    /// Accepts RFC 3339 or a bare date (taken as midnight UTC)
    pub fn parse_created_at(value: &str) -> Option<DateTime<FixedOffset>> {
        let value = value.trim();
        DateTime::parse_from_rfc3339(value).ok().or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc().fixed_offset())
        })
    }

    fn parse_timestamp(id: i64, field: &str, value: &str) -> Option<DateTime<FixedOffset>> {
        if value.trim().is_empty() {
            return None;
        }
        let parsed = Self::parse_created_at(value);
        if parsed.is_none() {
            warn!("Patient {}: ignoring malformed {} '{}'", id, field, value);
        }
        parsed
    }

    fn parse_day(id: i64, field: &str, value: &str) -> Option<NaiveDate> {
        if value.trim().is_empty() {
            return None;
        }
        let parsed = parse_calendar_day(value);
        if parsed.is_none() {
            warn!("Patient {}: ignoring malformed {} '{}'", id, field, value);
        }
        parsed
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
