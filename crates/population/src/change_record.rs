use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dancu_core::{Actor, ChangeRecordId, CitizenId, DomainResult, Entity, HouseholdId, UserId};

use crate::required_text;

/// Kind of population change being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    MoveIn,
    MoveOut,
    Birth,
    Death,
    TemporaryResidence,
    TemporaryAbsence,
    Other,
}

/// Population-change record (BienDong), audited per mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub id: ChangeRecordId,
    pub kind: ChangeKind,
    pub content: String,
    pub occurred_at: DateTime<Utc>,
    pub household_id: Option<HouseholdId>,
    pub citizen_id: Option<CitizenId>,
    pub created_by: UserId,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<UserId>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecordDraft {
    pub kind: ChangeKind,
    pub content: String,
    /// Defaults to the time of the write when absent.
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub household_id: Option<HouseholdId>,
    #[serde(default)]
    pub citizen_id: Option<CitizenId>,
}

impl ChangeRecordDraft {
    pub fn validate(self) -> DomainResult<Self> {
        Ok(Self {
            content: required_text("content", &self.content, 2000)?,
            ..self
        })
    }
}

impl ChangeRecord {
    /// Build a record from a validated draft, attributing it to `actor`.
    pub fn create(id: ChangeRecordId, draft: ChangeRecordDraft, actor: &Actor, now: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: draft.kind,
            content: draft.content,
            occurred_at: draft.occurred_at.unwrap_or(now),
            household_id: draft.household_id,
            citizen_id: draft.citizen_id,
            created_by: actor.user_id,
            created_by_name: actor.username.clone(),
            created_at: now,
            updated_by: None,
            updated_at: None,
        }
    }

    /// Replace the mutable fields. Authorship is preserved.
    pub fn apply_update(&mut self, draft: ChangeRecordDraft, actor: &Actor, now: DateTime<Utc>) {
        self.kind = draft.kind;
        self.content = draft.content;
        if let Some(at) = draft.occurred_at {
            self.occurred_at = at;
        }
        self.household_id = draft.household_id;
        self.citizen_id = draft.citizen_id;
        self.updated_by = Some(actor.user_id);
        self.updated_at = Some(now);
    }
}

impl Entity for ChangeRecord {
    type Id = ChangeRecordId;

    fn id(&self) -> ChangeRecordId {
        self.id
    }
}
