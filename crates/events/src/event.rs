use core::fmt;

use serde::{Deserialize, Serialize};

use dancu_core::{CitizenId, HouseholdId};

/// A domain-agnostic event.
///
/// Events are immutable facts. They are notifications, not commands.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "household.changed").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;
}

/// Kind of mutation a change event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeOperation {
    Create,
    Update,
    Delete,
}

impl ChangeOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeOperation::Create => "CREATE",
            ChangeOperation::Update => "UPDATE",
            ChangeOperation::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ChangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification published after a committed household or citizen mutation.
///
/// Listeners must tolerate events for entities that have been mutated again
/// (or removed) since the event was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A household (HoKhau) was created, updated or deleted.
    Household {
        household_id: HouseholdId,
        operation: ChangeOperation,
    },
    /// A citizen (NhanKhau) was created, updated or deleted.
    ///
    /// `household_id` is the household the citizen belongs to after the
    /// mutation (or belonged to, for deletes).
    Citizen {
        citizen_id: CitizenId,
        household_id: HouseholdId,
        operation: ChangeOperation,
    },
}

impl ChangeEvent {
    pub fn household(household_id: HouseholdId, operation: ChangeOperation) -> Self {
        Self::Household {
            household_id,
            operation,
        }
    }

    pub fn citizen(citizen_id: CitizenId, household_id: HouseholdId, operation: ChangeOperation) -> Self {
        Self::Citizen {
            citizen_id,
            household_id,
            operation,
        }
    }

    pub fn operation(&self) -> ChangeOperation {
        match self {
            ChangeEvent::Household { operation, .. } | ChangeEvent::Citizen { operation, .. } => *operation,
        }
    }

    /// Household whose fees are affected by this change.
    pub fn household_id(&self) -> HouseholdId {
        match self {
            ChangeEvent::Household { household_id, .. } | ChangeEvent::Citizen { household_id, .. } => {
                *household_id
            }
        }
    }
}

impl Event for ChangeEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ChangeEvent::Household { .. } => "household.changed",
            ChangeEvent::Citizen { .. } => "citizen.changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}

// Diagnostics only; not a stable wire format.
impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeEvent::Household {
                household_id,
                operation,
            } => write!(f, "household.changed{{household_id={household_id}, operation={operation}}}"),
            ChangeEvent::Citizen {
                citizen_id,
                household_id,
                operation,
            } => write!(
                f,
                "citizen.changed{{citizen_id={citizen_id}, household_id={household_id}, operation={operation}}}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citizen_event_exposes_owning_household() {
        let ev = ChangeEvent::citizen(CitizenId::new(9), HouseholdId::new(3), ChangeOperation::Update);
        assert_eq!(ev.household_id(), HouseholdId::new(3));
        assert_eq!(ev.operation(), ChangeOperation::Update);
        assert_eq!(ev.event_type(), "citizen.changed");
    }

    #[test]
    fn events_serialize_with_kind_tag_and_upper_case_operation() {
        let ev = ChangeEvent::household(HouseholdId::new(1), ChangeOperation::Create);
        let json = serde_json::to_value(ev).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "household", "household_id": 1, "operation": "CREATE"})
        );
    }

    #[test]
    fn display_mentions_ids_and_operation() {
        let ev = ChangeEvent::household(HouseholdId::new(5), ChangeOperation::Delete);
        let s = ev.to_string();
        assert!(s.contains("household_id=5"));
        assert!(s.contains("DELETE"));
    }
}
