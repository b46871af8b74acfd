use std::sync::Arc;

use chrono::Utc;

use dancu_core::{Actor, CitizenId, DomainError, DomainResult, HouseholdId};
use dancu_events::{ChangeNotifier, ChangeOperation};
use dancu_population::{Citizen, CitizenDraft, Household};

use crate::repository::{CitizenRepository, HouseholdRepository};

#[derive(Clone)]
pub struct CitizenService {
    citizens: Arc<dyn CitizenRepository>,
    households: Arc<dyn HouseholdRepository>,
    notifier: ChangeNotifier,
}

impl CitizenService {
    pub fn new(
        citizens: Arc<dyn CitizenRepository>,
        households: Arc<dyn HouseholdRepository>,
        notifier: ChangeNotifier,
    ) -> Self {
        Self {
            citizens,
            households,
            notifier,
        }
    }

    /// Citizens in ascending id order, optionally restricted to one household.
    pub fn list(&self, household_id: Option<HouseholdId>) -> DomainResult<Vec<Citizen>> {
        match household_id {
            Some(h) => self.citizens.list_by_household(h),
            None => self.citizens.list(),
        }
    }

    pub fn get(&self, id: CitizenId) -> DomainResult<Citizen> {
        self.citizens.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn create(&self, draft: CitizenDraft, actor: &Actor) -> DomainResult<Citizen> {
        let draft = draft.validate(Utc::now().date_naive())?;
        self.ensure_live_household(draft.household_id)?;

        let citizen = self.citizens.insert(draft, Utc::now())?;
        tracing::info!(
            citizen_id = %citizen.id,
            household_id = %citizen.household_id,
            actor = %actor.username,
            "citizen created"
        );

        self.notifier
            .notify_citizen_changed(citizen.id, citizen.household_id, ChangeOperation::Create);
        Ok(citizen)
    }

    /// Replace the citizen's fields. Moving to another household is allowed;
    /// the published event names the new household.
    pub fn update(&self, id: CitizenId, draft: CitizenDraft, actor: &Actor) -> DomainResult<Citizen> {
        let mut citizen = self.get(id)?;
        let draft = draft.validate(Utc::now().date_naive())?;
        self.ensure_live_household(draft.household_id)?;

        let previous_household = citizen.household_id;
        citizen.apply_update(draft, Utc::now());
        self.citizens.save(citizen.clone())?;
        tracing::info!(
            citizen_id = %id,
            household_id = %citizen.household_id,
            previous_household_id = %previous_household,
            actor = %actor.username,
            "citizen updated"
        );

        self.notifier
            .notify_citizen_changed(id, citizen.household_id, ChangeOperation::Update);
        Ok(citizen)
    }

    pub fn delete(&self, id: CitizenId, actor: &Actor) -> DomainResult<()> {
        let removed = self.citizens.remove(id)?.ok_or(DomainError::NotFound)?;
        tracing::info!(
            citizen_id = %id,
            household_id = %removed.household_id,
            actor = %actor.username,
            "citizen deleted"
        );

        self.notifier
            .notify_citizen_changed(id, removed.household_id, ChangeOperation::Delete);
        Ok(())
    }

    fn ensure_live_household(&self, household_id: HouseholdId) -> DomainResult<()> {
        match self.households.find_by_id(household_id)? {
            Some(h) if Household::is_live(&h) => Ok(()),
            _ => Err(DomainError::validation(format!(
                "household {household_id} does not exist"
            ))),
        }
    }
}
