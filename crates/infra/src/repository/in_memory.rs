use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use dancu_core::{Actor, ChangeRecordId, CitizenId, DomainError, DomainResult, HouseholdId};
use dancu_population::{ChangeRecord, ChangeRecordDraft, Citizen, CitizenDraft, Household, HouseholdDraft};

use super::table::InMemoryTable;
use super::{ChangeRecordRepository, CitizenRepository, HouseholdRepository};

#[derive(Debug, Default)]
pub struct InMemoryHouseholdRepository {
    table: InMemoryTable<HouseholdId, Household>,
}

impl InMemoryHouseholdRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HouseholdRepository for InMemoryHouseholdRepository {
    fn insert(&self, draft: HouseholdDraft, now: DateTime<Utc>) -> DomainResult<Household> {
        let mut state = self.table.write()?;

        ensure_registration_number_free(&state.rows, None, &draft.registration_number)?;

        let id = HouseholdId::new(state.next_id());
        let household = Household::create(id, draft, now);
        state.rows.insert(id, household.clone());
        Ok(household)
    }

    fn update(&self, id: HouseholdId, draft: HouseholdDraft, now: DateTime<Utc>) -> DomainResult<Household> {
        let mut state = self.table.write()?;
        if !state.rows.get(&id).is_some_and(Household::is_live) {
            return Err(DomainError::NotFound);
        }
        ensure_registration_number_free(&state.rows, Some(id), &draft.registration_number)?;

        let household = state.rows.get_mut(&id).ok_or(DomainError::NotFound)?;
        household.apply_update(draft, now);
        Ok(household.clone())
    }

    fn mark_deleted(&self, id: HouseholdId, now: DateTime<Utc>) -> DomainResult<Household> {
        let mut state = self.table.write()?;
        let household = state
            .rows
            .get_mut(&id)
            .filter(|h| h.is_live())
            .ok_or(DomainError::NotFound)?;
        household.mark_deleted(now);
        Ok(household.clone())
    }

    fn find_by_id(&self, id: HouseholdId) -> DomainResult<Option<Household>> {
        self.table.get(&id)
    }

    fn list_active(&self) -> DomainResult<Vec<Household>> {
        self.table.select(Household::is_live)
    }

    fn exists_by_registration_number(&self, registration_number: &str) -> DomainResult<bool> {
        Ok(self
            .table
            .read()?
            .rows
            .values()
            .any(|h| h.registration_number == registration_number))
    }
}

/// Unique index on the natural key, deleted rows included. `owner` is the row
/// being updated, which may keep its own number.
fn ensure_registration_number_free(
    rows: &BTreeMap<HouseholdId, Household>,
    owner: Option<HouseholdId>,
    registration_number: &str,
) -> DomainResult<()> {
    let taken = rows
        .values()
        .any(|h| Some(h.id) != owner && h.registration_number == registration_number);
    if taken {
        return Err(DomainError::validation(format!(
            "registration number '{registration_number}' already exists"
        )));
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct InMemoryCitizenRepository {
    table: InMemoryTable<CitizenId, Citizen>,
}

impl InMemoryCitizenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CitizenRepository for InMemoryCitizenRepository {
    fn insert(&self, draft: CitizenDraft, now: DateTime<Utc>) -> DomainResult<Citizen> {
        let mut state = self.table.write()?;
        let id = CitizenId::new(state.next_id());
        let citizen = Citizen::create(id, draft, now);
        state.rows.insert(id, citizen.clone());
        Ok(citizen)
    }

    fn save(&self, citizen: Citizen) -> DomainResult<()> {
        self.table.save(citizen)
    }

    fn remove(&self, id: CitizenId) -> DomainResult<Option<Citizen>> {
        self.table.remove(&id)
    }

    fn find_by_id(&self, id: CitizenId) -> DomainResult<Option<Citizen>> {
        self.table.get(&id)
    }

    fn list(&self) -> DomainResult<Vec<Citizen>> {
        self.table.select(|_| true)
    }

    fn list_by_household(&self, household_id: HouseholdId) -> DomainResult<Vec<Citizen>> {
        self.table.select(|c| c.household_id == household_id)
    }

    fn count_by_household(&self, household_id: HouseholdId) -> DomainResult<usize> {
        Ok(self
            .table
            .read()?
            .rows
            .values()
            .filter(|c| c.household_id == household_id)
            .count())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryChangeRecordRepository {
    table: InMemoryTable<ChangeRecordId, ChangeRecord>,
}

impl InMemoryChangeRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChangeRecordRepository for InMemoryChangeRecordRepository {
    fn insert(&self, draft: ChangeRecordDraft, actor: &Actor, now: DateTime<Utc>) -> DomainResult<ChangeRecord> {
        let mut state = self.table.write()?;
        let id = ChangeRecordId::new(state.next_id());
        let record = ChangeRecord::create(id, draft, actor, now);
        state.rows.insert(id, record.clone());
        Ok(record)
    }

    fn save(&self, record: ChangeRecord) -> DomainResult<()> {
        self.table.save(record)
    }

    fn remove(&self, id: ChangeRecordId) -> DomainResult<Option<ChangeRecord>> {
        self.table.remove(&id)
    }

    fn find_by_id(&self, id: ChangeRecordId) -> DomainResult<Option<ChangeRecord>> {
        self.table.get(&id)
    }

    fn list(&self) -> DomainResult<Vec<ChangeRecord>> {
        self.table.select(|_| true)
    }
}
