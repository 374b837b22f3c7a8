//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined in
//! the `shared` crate to these internal types.

pub mod patient {
    use crate::backend::domain::models::patient::FamilyGroup;

    /// Input for registering a new patient.
    #[derive(Debug, Clone, Default)]
    pub struct CreatePatientCommand {
        pub name: String,
        pub sex: Option<String>,
        pub date_of_birth: Option<String>,
        pub phone_number: Option<String>,
        pub email: Option<String>,
        pub is_family_head: bool,
        pub family_id: Option<i64>,
        pub next_appointment_date: Option<String>,
        pub hmo: Option<String>,
    }

    /// Result of building the family directory.
    #[derive(Debug, Clone)]
    pub struct FamilyDirectoryResult {
        pub groups: Vec<FamilyGroup>,
        /// Members left out because their family head is unknown
        pub orphaned_member_ids: Vec<i64>,
    }

    impl FamilyDirectoryResult {
        pub fn total_patients(&self) -> usize {
            self.groups.iter().map(FamilyGroup::len).sum()
        }
    }
}

pub mod revenue {
    use shared::RevenuePeriod;

    /// Query for a revenue report over the stored receipt export.
    #[derive(Debug, Clone)]
    pub struct RevenueReportQuery {
        pub period: RevenuePeriod,
        /// Defaults to today when absent
        pub reference: Option<String>,
    }
}
