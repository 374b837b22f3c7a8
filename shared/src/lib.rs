use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Patient record as exchanged with the record store.
///
/// Field names follow the backend's JSON shape (camelCase). Everything except
/// `id` and `name` is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sex: Option<String>,
    /// Calendar date (YYYY-MM-DD)
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_family_head: bool,
    /// ID of the family head; only set on family members
    #[serde(default)]
    pub family_id: Option<i64>,
    /// Creation timestamp (RFC 3339, or a bare YYYY-MM-DD date)
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub next_appointment_date: Option<String>,
    #[serde(default)]
    pub hmo: Option<String>,
}

/// A family head (or standalone patient) together with its members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGroup {
    pub head: PatientRecord,
    pub members: Vec<PatientRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDirectoryResponse {
    pub groups: Vec<FamilyGroup>,
    /// Number of records represented across all groups (heads + members)
    pub total_patients: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientListResponse {
    pub patients: Vec<PatientRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub name: String,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_family_head: bool,
    #[serde(default)]
    pub family_id: Option<i64>,
    #[serde(default)]
    pub next_appointment_date: Option<String>,
    #[serde(default)]
    pub hmo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub patient: PatientRecord,
    pub success_message: String,
}

/// Capability tag of the signed-in staff member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    Admin,
    Dentist,
    Receptionist,
    /// Least privileged role; used when no role is supplied
    #[default]
    Assistant,
}

impl ViewerRole {
    /// Whether this role may see (and search by) patient phone numbers and emails
    pub fn can_view_contact_details(&self) -> bool {
        !matches!(self, ViewerRole::Assistant)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerRole::Admin => "admin",
            ViewerRole::Dentist => "dentist",
            ViewerRole::Receptionist => "receptionist",
            ViewerRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewerRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(ViewerRole::Admin),
            "dentist" => Ok(ViewerRole::Dentist),
            "receptionist" => Ok(ViewerRole::Receptionist),
            "assistant" => Ok(ViewerRole::Assistant),
            _ => Err(ParseEnumError::new("viewer role", s)),
        }
    }
}

/// Time window used by the revenue report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenuePeriod {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl RevenuePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevenuePeriod::Day => "day",
            RevenuePeriod::Week => "week",
            RevenuePeriod::Month => "month",
            RevenuePeriod::Year => "year",
            RevenuePeriod::All => "all",
        }
    }
}

impl fmt::Display for RevenuePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RevenuePeriod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(RevenuePeriod::Day),
            "week" => Ok(RevenuePeriod::Week),
            "month" => Ok(RevenuePeriod::Month),
            "year" => Ok(RevenuePeriod::Year),
            "all" => Ok(RevenuePeriod::All),
            _ => Err(ParseEnumError::new("revenue period", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// Request for aggregating an ad-hoc receipt table.
///
/// `rows` is the raw export: the first row is the header, every following row
/// is positional (date first, amount in the eighth column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReportRequest {
    pub period: RevenuePeriod,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReportResponse {
    pub period: RevenuePeriod,
    /// Reference the period was anchored to, normalized (absent for `all`)
    pub reference: Option<String>,
    pub total: f64,
    /// Valid rows that fell inside the period
    pub included_rows: usize,
    /// Rows excluded because of a missing, sentinel or unparseable field
    pub skipped_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_record_deserializes_backend_json() {
        let json = r#"{
            "id": 7,
            "name": "Ada Obi",
            "phoneNumber": "0803",
            "isFamilyHead": false,
            "familyId": 3,
            "createdAt": "2024-05-01T09:30:00Z"
        }"#;

        let record: PatientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.family_id, Some(3));
        assert_eq!(record.phone_number.as_deref(), Some("0803"));
        assert!(record.email.is_none());
        assert!(!record.is_family_head);
    }

    #[test]
    fn test_is_family_head_defaults_to_false() {
        let record: PatientRecord = serde_json::from_str(r#"{"id": 1, "name": "Solo"}"#).unwrap();
        assert!(!record.is_family_head);
        assert!(record.family_id.is_none());
    }

    #[test]
    fn test_viewer_role_parsing() {
        assert_eq!("Admin".parse::<ViewerRole>().unwrap(), ViewerRole::Admin);
        assert_eq!(" receptionist ".parse::<ViewerRole>().unwrap(), ViewerRole::Receptionist);
        assert!("janitor".parse::<ViewerRole>().is_err());
        assert_eq!(ViewerRole::default(), ViewerRole::Assistant);
    }

    #[test]
    fn test_contact_visibility() {
        assert!(ViewerRole::Admin.can_view_contact_details());
        assert!(ViewerRole::Dentist.can_view_contact_details());
        assert!(ViewerRole::Receptionist.can_view_contact_details());
        assert!(!ViewerRole::Assistant.can_view_contact_details());
    }

    #[test]
    fn test_revenue_period_parsing() {
        assert_eq!("WEEK".parse::<RevenuePeriod>().unwrap(), RevenuePeriod::Week);
        assert_eq!(RevenuePeriod::Month.to_string(), "month");

        let err = "fortnight".parse::<RevenuePeriod>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown revenue period: 'fortnight'");
    }

    #[test]
    fn test_revenue_request_accepts_mixed_cells() {
        let json = r#"{
            "period": "all",
            "rows": [["Date", "Amount"], ["2024-05-01", 1500], ["2024-05-02", null]]
        }"#;

        let request: RevenueReportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.period, RevenuePeriod::All);
        assert!(request.reference.is_none());
        assert_eq!(request.rows.len(), 3);
        assert!(request.rows[2][1].is_null());
    }
}
