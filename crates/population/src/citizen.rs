use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use dancu_core::{CitizenId, DomainError, DomainResult, Entity, HouseholdId};

use crate::{optional_text, required_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Citizen record (NhanKhau). Belongs to exactly one household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citizen {
    pub id: CitizenId,
    pub household_id: HouseholdId,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    /// National identity card number (9-digit CMND or 12-digit CCCD).
    pub national_id: Option<String>,
    pub relationship_to_head: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitizenDraft {
    pub household_id: HouseholdId,
    pub full_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub relationship_to_head: Option<String>,
}

impl CitizenDraft {
    /// Trim and check every field. Household existence is checked by the
    /// service, which owns the repository.
    pub fn validate(self, today: NaiveDate) -> DomainResult<Self> {
        let full_name = required_text("full_name", &self.full_name, 200)?;

        if let Some(dob) = self.date_of_birth {
            if dob > today {
                return Err(DomainError::validation("date_of_birth cannot be in the future"));
            }
        }

        let national_id = optional_text(self.national_id);
        if let Some(nid) = &national_id {
            let digits_only = nid.chars().all(|c| c.is_ascii_digit());
            if !digits_only || !(nid.len() == 9 || nid.len() == 12) {
                return Err(DomainError::validation("national_id must be 9 or 12 digits"));
            }
        }

        Ok(Self {
            household_id: self.household_id,
            full_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            national_id,
            relationship_to_head: optional_text(self.relationship_to_head),
        })
    }
}

impl Citizen {
    pub fn create(id: CitizenId, draft: CitizenDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            household_id: draft.household_id,
            full_name: draft.full_name,
            date_of_birth: draft.date_of_birth,
            gender: draft.gender,
            national_id: draft.national_id,
            relationship_to_head: draft.relationship_to_head,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, draft: CitizenDraft, now: DateTime<Utc>) {
        self.household_id = draft.household_id;
        self.full_name = draft.full_name;
        self.date_of_birth = draft.date_of_birth;
        self.gender = draft.gender;
        self.national_id = draft.national_id;
        self.relationship_to_head = draft.relationship_to_head;
        self.updated_at = now;
    }
}

impl Entity for Citizen {
    type Id = CitizenId;

    fn id(&self) -> CitizenId {
        self.id
    }
}
