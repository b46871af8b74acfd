use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dancu_core::{DomainResult, Entity, HouseholdId};

use crate::required_text;

pub const MAX_REGISTRATION_NUMBER_LEN: usize = 32;

/// Household record (HoKhau): the unit fees are computed against.
///
/// Households are never physically removed; `is_deleted` hides them from
/// listings and lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub id: HouseholdId,
    /// Household registration book number (soHoKhau). Unique natural key.
    pub registration_number: String,
    pub head_name: String,
    pub address: String,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable household fields as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdDraft {
    pub registration_number: String,
    pub head_name: String,
    pub address: String,
}

impl HouseholdDraft {
    /// Trim and check every field.
    pub fn validate(self) -> DomainResult<Self> {
        Ok(Self {
            registration_number: required_text(
                "registration_number",
                &self.registration_number,
                MAX_REGISTRATION_NUMBER_LEN,
            )?,
            head_name: required_text("head_name", &self.head_name, 200)?,
            address: required_text("address", &self.address, 500)?,
        })
    }
}

impl Household {
    /// Build a live household from an already validated draft.
    pub fn create(id: HouseholdId, draft: HouseholdDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            registration_number: draft.registration_number,
            head_name: draft.head_name,
            address: draft.address,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, draft: HouseholdDraft, now: DateTime<Utc>) {
        self.registration_number = draft.registration_number;
        self.head_name = draft.head_name;
        self.address = draft.address;
        self.updated_at = now;
    }

    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.updated_at = now;
    }

    pub fn is_live(&self) -> bool {
        !self.is_deleted
    }
}

impl Entity for Household {
    type Id = HouseholdId;

    fn id(&self) -> HouseholdId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dancu_core::DomainError;

    fn draft(number: &str) -> HouseholdDraft {
        HouseholdDraft {
            registration_number: number.to_string(),
            head_name: " Nguyen Van A ".to_string(),
            address: "12 Ta Quang Buu, Hai Ba Trung".to_string(),
        }
    }

    #[test]
    fn validate_trims_fields() {
        let d = draft("  HK-001 ").validate().unwrap();
        assert_eq!(d.registration_number, "HK-001");
        assert_eq!(d.head_name, "Nguyen Van A");
    }

    #[test]
    fn validate_rejects_blank_registration_number() {
        let err = draft("   ").validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m.contains("registration_number")));
    }

    #[test]
    fn validate_rejects_overlong_registration_number() {
        let err = draft(&"9".repeat(MAX_REGISTRATION_NUMBER_LEN + 1)).validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn soft_delete_keeps_the_row_but_hides_it() {
        let now = Utc::now();
        let mut h = Household::create(HouseholdId::new(1), draft("HK-1").validate().unwrap(), now);
        assert!(h.is_live());

        h.mark_deleted(now);
        assert!(!h.is_live());
        assert_eq!(h.registration_number, "HK-1");
    }

    #[test]
    fn missing_deleted_flag_deserializes_as_false() {
        let now = Utc::now();
        let mut json = serde_json::to_value(Household::create(
            HouseholdId::new(3),
            draft("HK-3").validate().unwrap(),
            now,
        ))
        .unwrap();
        json.as_object_mut().unwrap().remove("is_deleted");

        let h: Household = serde_json::from_value(json).unwrap();
        assert!(!h.is_deleted);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a validated draft is a fixed point of validation.
            #[test]
            fn validation_is_idempotent(
                number in "[ ]{0,3}[A-Z0-9-]{1,20}[ ]{0,3}",
                head in "[A-Za-z][A-Za-z ]{0,40}",
                address in "[A-Za-z0-9][A-Za-z0-9 ,]{0,80}"
            ) {
                let once = HouseholdDraft { registration_number: number, head_name: head, address }
                    .validate()
                    .unwrap();
                let twice = once.clone().validate().unwrap();
                prop_assert_eq!(once, twice);
            }
        }
    }
}
