use std::sync::Arc;

use chrono::Utc;

use dancu_core::{Actor, DomainError, DomainResult, HouseholdId};
use dancu_events::{ChangeNotifier, ChangeOperation};
use dancu_population::{Household, HouseholdDraft};

use crate::repository::HouseholdRepository;

#[derive(Clone)]
pub struct HouseholdService {
    households: Arc<dyn HouseholdRepository>,
    notifier: ChangeNotifier,
}

impl HouseholdService {
    pub fn new(households: Arc<dyn HouseholdRepository>, notifier: ChangeNotifier) -> Self {
        Self { households, notifier }
    }

    /// Live households, ascending id.
    pub fn list(&self) -> DomainResult<Vec<Household>> {
        self.households.list_active()
    }

    /// A live household; soft-deleted ones are `NotFound`.
    pub fn get(&self, id: HouseholdId) -> DomainResult<Household> {
        self.households
            .find_by_id(id)?
            .filter(Household::is_live)
            .ok_or(DomainError::NotFound)
    }

    pub fn create(&self, draft: HouseholdDraft, actor: &Actor) -> DomainResult<Household> {
        let draft = draft.validate()?;
        // `insert` enforces the same index under its lock.
        self.ensure_registration_number_free(&draft.registration_number)?;

        let household = self.households.insert(draft, Utc::now())?;
        tracing::info!(
            household_id = %household.id,
            registration_number = %household.registration_number,
            actor = %actor.username,
            "household created"
        );

        self.notifier
            .notify_household_changed(household.id, ChangeOperation::Create);
        Ok(household)
    }

    /// Replace the household's fields. The repository rechecks liveness and the
    /// registration number under its write lock.
    pub fn update(&self, id: HouseholdId, draft: HouseholdDraft, actor: &Actor) -> DomainResult<Household> {
        let draft = draft.validate()?;
        let household = self.households.update(id, draft, Utc::now())?;
        tracing::info!(household_id = %id, actor = %actor.username, "household updated");

        self.notifier
            .notify_household_changed(id, ChangeOperation::Update);
        Ok(household)
    }

    /// Soft delete: the row stays, flagged, and drops out of listings.
    pub fn delete(&self, id: HouseholdId, actor: &Actor) -> DomainResult<()> {
        self.households.mark_deleted(id, Utc::now())?;
        tracing::info!(household_id = %id, actor = %actor.username, "household deleted");

        self.notifier
            .notify_household_changed(id, ChangeOperation::Delete);
        Ok(())
    }

    fn ensure_registration_number_free(&self, registration_number: &str) -> DomainResult<()> {
        if self.households.exists_by_registration_number(registration_number)? {
            return Err(DomainError::validation(format!(
                "registration number '{registration_number}' already exists"
            )));
        }
        Ok(())
    }
}
