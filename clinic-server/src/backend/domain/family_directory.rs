//! Family directory domain logic.
//!
//! Turns the flat patient list into family groups (a head or standalone
//! patient plus its members) and applies the directory's search and date
//! filters. Everything here is a pure function of its inputs: no I/O, no
//! logging, and the input slice is never modified.

use chrono::NaiveDate;
use shared::ViewerRole;
use std::collections::BTreeMap;

use crate::backend::domain::models::patient::{FamilyGroup, Patient, PatientCategory};

/// Filters applied to the family directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryFilter {
    /// Case-insensitive substring; empty means no search
    pub search_term: Option<String>,
    /// Keep groups with a record created on this calendar day
    pub selected_date: Option<NaiveDate>,
    pub viewer_role: ViewerRole,
}

/// Stateless service that builds and filters family groups
#[derive(Debug, Clone, Default)]
pub struct FamilyDirectoryService;

impl FamilyDirectoryService {
    pub fn new() -> Self {
        Self
    }

    /// Group `patients` into families and keep the groups matching `filter`.
    ///
    /// Groups come out in ascending id order of their head. Members keep the
    /// order they had in `patients`. A group is kept or dropped as a whole.
    pub fn group_patients(&self, patients: &[Patient], filter: &DirectoryFilter) -> Vec<FamilyGroup> {
        let search_term = filter
            .search_term
            .as_deref()
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);

        self.build_groups(patients)
            .into_iter()
            .filter(|group| match &search_term {
                Some(term) => self.matches_search(group, term, filter.viewer_role),
                None => true,
            })
            .filter(|group| match filter.selected_date {
                Some(date) => self.matches_date(group, date),
                None => true,
            })
            .collect()
    }

    /// Unfiltered grouping. Members whose family head is unknown are dropped.
    pub fn build_groups(&self, patients: &[Patient]) -> Vec<FamilyGroup> {
        let mut groups: BTreeMap<i64, FamilyGroup> = BTreeMap::new();

        for head in patients.iter().filter(|p| p.category() == PatientCategory::FamilyHead) {
            groups.insert(head.id, FamilyGroup::new(head.clone()));
        }

        // Attach members before standalones are added so a member can only
        // ever land under a real family head
        for member in patients {
            if let PatientCategory::FamilyMember(family_id) = member.category() {
                if let Some(group) = groups.get_mut(&family_id) {
                    group.members.push(member.clone());
                }
            }
        }

        for standalone in patients.iter().filter(|p| p.category() == PatientCategory::Standalone) {
            groups
                .entry(standalone.id)
                .or_insert_with(|| FamilyGroup::new(standalone.clone()));
        }

        groups.into_values().collect()
    }

    /// Members whose `family_id` does not point at a known family head
    pub fn orphaned_members<'a>(&self, patients: &'a [Patient]) -> Vec<&'a Patient> {
        let is_head = |id: i64| {
            patients
                .iter()
                .any(|p| p.id == id && p.category() == PatientCategory::FamilyHead)
        };

        patients
            .iter()
            .filter(|p| matches!(p.category(), PatientCategory::FamilyMember(family_id) if !is_head(family_id)))
            .collect()
    }

    /// `term` must already be lowercase
    fn matches_search(&self, group: &FamilyGroup, term: &str, viewer_role: ViewerRole) -> bool {
        let contains = |value: Option<&str>| value.is_some_and(|v| v.to_lowercase().contains(term));

        if contains(Some(group.head.name.as_str())) {
            return true;
        }

        if viewer_role.can_view_contact_details()
            && (contains(group.head.phone_number.as_deref()) || contains(group.head.email.as_deref()))
        {
            return true;
        }

        group.members.iter().any(|member| contains(Some(member.name.as_str())))
    }

    fn matches_date(&self, group: &FamilyGroup, date: NaiveDate) -> bool {
        group.patients().any(|patient| patient.created_on() == Some(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn patient(id: i64, name: &str) -> Patient {
        Patient {
            id,
            name: name.to_string(),
            sex: None,
            date_of_birth: None,
            phone_number: None,
            email: None,
            is_family_head: false,
            family_id: None,
            created_at: None,
            next_appointment_date: None,
            hmo: None,
        }
    }

    fn head(id: i64, name: &str) -> Patient {
        Patient {
            is_family_head: true,
            ..patient(id, name)
        }
    }

    fn member(id: i64, name: &str, family_id: i64) -> Patient {
        Patient {
            family_id: Some(family_id),
            ..patient(id, name)
        }
    }

    fn created(mut p: Patient, timestamp: &str) -> Patient {
        p.created_at = Some(DateTime::parse_from_rfc3339(timestamp).unwrap());
        p
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Two families, one standalone, one orphan
    fn sample_patients() -> Vec<Patient> {
        vec![
            created(member(4, "Chidi Okafor", 1), "2024-03-10T12:00:00Z"),
            created(head(1, "Ngozi Okafor"), "2024-01-05T09:00:00Z"),
            Patient {
                phone_number: Some("0803-555-0101".to_string()),
                email: Some("bello@example.com".to_string()),
                ..created(head(2, "Musa Bello"), "2024-02-20T08:15:00Z")
            },
            created(member(5, "Amina Bello", 2), "2024-02-20T08:20:00Z"),
            created(patient(3, "Tunde Ade"), "2024-06-01T10:00:00Z"),
            created(member(6, "Lost Member", 99), "2024-06-01T11:00:00Z"),
            created(member(7, "Ifeoma Okafor", 1), "2024-04-01T10:00:00Z"),
        ]
    }

    fn group_ids(groups: &[FamilyGroup]) -> Vec<i64> {
        groups.iter().map(|g| g.head.id).collect()
    }

    fn filter() -> DirectoryFilter {
        DirectoryFilter {
            viewer_role: ViewerRole::Admin,
            ..DirectoryFilter::default()
        }
    }

    #[test]
    fn test_groups_heads_members_and_standalones() {
        let service = FamilyDirectoryService::new();
        let groups = service.group_patients(&sample_patients(), &filter());

        assert_eq!(group_ids(&groups), vec![1, 2, 3]);

        let okafor: Vec<i64> = groups[0].members.iter().map(|m| m.id).collect();
        assert_eq!(okafor, vec![4, 7]);
        assert_eq!(groups[1].members.len(), 1);
        assert!(groups[2].members.is_empty());
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let service = FamilyDirectoryService::new();
        let patients = sample_patients();
        let before = patients.clone();

        let first = service.group_patients(&patients, &filter());
        let second = service.group_patients(&patients, &filter());

        assert_eq!(first, second);
        assert_eq!(patients, before);
    }

    #[test]
    fn test_completeness_counts_every_record_but_orphans() {
        let service = FamilyDirectoryService::new();
        let patients = sample_patients();

        let groups = service.build_groups(&patients);
        let represented: usize = groups.iter().map(FamilyGroup::len).sum();
        let orphans = service.orphaned_members(&patients).len();

        assert_eq!(orphans, 1);
        assert_eq!(represented, patients.len() - orphans);
    }

    #[test]
    fn test_orphaned_members_are_silently_dropped() {
        let service = FamilyDirectoryService::new();
        let patients = sample_patients();

        let groups = service.build_groups(&patients);
        assert!(groups.iter().flat_map(|g| g.patients()).all(|p| p.id != 6));

        let orphan_ids: Vec<i64> = service.orphaned_members(&patients).iter().map(|p| p.id).collect();
        assert_eq!(orphan_ids, vec![6]);
    }

    #[test]
    fn test_member_of_standalone_is_orphaned() {
        let service = FamilyDirectoryService::new();
        let patients = vec![patient(1, "Solo"), member(2, "Follower", 1)];

        let groups = service.build_groups(&patients);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].members.is_empty());
        assert_eq!(service.orphaned_members(&patients).len(), 1);
    }

    #[test]
    fn test_search_by_head_name_is_case_insensitive() {
        let service = FamilyDirectoryService::new();
        let filter = DirectoryFilter {
            search_term: Some("NGOZI".to_string()),
            ..filter()
        };

        let groups = service.group_patients(&sample_patients(), &filter);
        assert_eq!(group_ids(&groups), vec![1]);
        // The whole family comes along
        assert_eq!(groups[0].members.len(), 2);
    }

    #[test]
    fn test_search_by_member_name_keeps_whole_group() {
        let service = FamilyDirectoryService::new();
        let filter = DirectoryFilter {
            search_term: Some("amina".to_string()),
            ..filter()
        };

        let groups = service.group_patients(&sample_patients(), &filter);
        assert_eq!(group_ids(&groups), vec![2]);
        assert_eq!(groups[0].head.name, "Musa Bello");
    }

    #[test]
    fn test_search_by_contact_details_depends_on_role() {
        let service = FamilyDirectoryService::new();
        let patients = sample_patients();

        let by_phone = DirectoryFilter {
            search_term: Some("555-0101".to_string()),
            ..filter()
        };
        assert_eq!(group_ids(&service.group_patients(&patients, &by_phone)), vec![2]);

        let by_email = DirectoryFilter {
            search_term: Some("@EXAMPLE.com".to_string()),
            viewer_role: ViewerRole::Receptionist,
            ..DirectoryFilter::default()
        };
        assert_eq!(group_ids(&service.group_patients(&patients, &by_email)), vec![2]);

        let restricted = DirectoryFilter {
            search_term: Some("555-0101".to_string()),
            viewer_role: ViewerRole::Assistant,
            ..DirectoryFilter::default()
        };
        assert!(service.group_patients(&patients, &restricted).is_empty());
    }

    #[test]
    fn test_empty_search_term_matches_everything() {
        let service = FamilyDirectoryService::new();
        let filter = DirectoryFilter {
            search_term: Some(String::new()),
            ..filter()
        };

        assert_eq!(service.group_patients(&sample_patients(), &filter).len(), 3);
    }

    #[test]
    fn test_date_filter_matches_head_or_member() {
        let service = FamilyDirectoryService::new();
        let patients = sample_patients();

        let head_day = DirectoryFilter {
            selected_date: Some(date(2024, 1, 5)),
            ..filter()
        };
        assert_eq!(group_ids(&service.group_patients(&patients, &head_day)), vec![1]);

        let member_day = DirectoryFilter {
            selected_date: Some(date(2024, 4, 1)),
            ..filter()
        };
        assert_eq!(group_ids(&service.group_patients(&patients, &member_day)), vec![1]);

        // The orphan was created on 2024-06-01 too but never reaches a group
        let standalone_day = DirectoryFilter {
            selected_date: Some(date(2024, 6, 1)),
            ..filter()
        };
        assert_eq!(group_ids(&service.group_patients(&patients, &standalone_day)), vec![3]);
    }

    #[test]
    fn test_date_filter_ignores_time_of_day() {
        let service = FamilyDirectoryService::new();
        let patients = vec![created(patient(1, "Late"), "2024-06-01T23:59:59Z")];
        let filter = DirectoryFilter {
            selected_date: Some(date(2024, 6, 1)),
            ..filter()
        };

        assert_eq!(service.group_patients(&patients, &filter).len(), 1);
    }

    #[test]
    fn test_missing_creation_date_never_matches() {
        let service = FamilyDirectoryService::new();
        let patients = vec![patient(1, "No Timestamp")];
        let filter = DirectoryFilter {
            selected_date: Some(date(2024, 6, 1)),
            ..filter()
        };

        assert!(service.group_patients(&patients, &filter).is_empty());
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let service = FamilyDirectoryService::new();
        let patients = sample_patients();

        // Term matches the Okafor family only, date matches Tunde Ade only
        let disjoint = DirectoryFilter {
            search_term: Some("okafor".to_string()),
            selected_date: Some(date(2024, 6, 1)),
            ..filter()
        };
        assert!(service.group_patients(&patients, &disjoint).is_empty());

        let joint = DirectoryFilter {
            search_term: Some("okafor".to_string()),
            selected_date: Some(date(2024, 3, 10)),
            ..filter()
        };
        assert_eq!(group_ids(&service.group_patients(&patients, &joint)), vec![1]);
    }
}
