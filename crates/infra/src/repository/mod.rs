//! Persistence collaborator contracts and in-memory implementations.
//!
//! Each write method is its own commit: once it returns `Ok` the change is
//! visible to every subsequent read. Read-modify-write operations on
//! households happen under a single lock, so checks and writes cannot
//! interleave with another writer.

use chrono::{DateTime, Utc};

use dancu_core::{Actor, ChangeRecordId, CitizenId, DomainResult, HouseholdId};
use dancu_population::{ChangeRecord, ChangeRecordDraft, Citizen, CitizenDraft, Household, HouseholdDraft};

pub mod in_memory;
pub mod table;

pub use in_memory::{InMemoryChangeRecordRepository, InMemoryCitizenRepository, InMemoryHouseholdRepository};
pub use table::InMemoryTable;

pub trait HouseholdRepository: Send + Sync {
    /// Assign an id and store a new live household.
    ///
    /// Fails with `Validation` if the registration number is already taken
    /// (including by soft-deleted households).
    fn insert(&self, draft: HouseholdDraft, now: DateTime<Utc>) -> DomainResult<Household>;

    /// Apply `draft` to a live household and return the new row.
    ///
    /// `NotFound` if the id is unknown or soft-deleted; `Validation` if another
    /// household (deleted or not) already holds the registration number.
    fn update(&self, id: HouseholdId, draft: HouseholdDraft, now: DateTime<Utc>) -> DomainResult<Household>;

    /// Soft-delete a live household. `NotFound` if unknown or already deleted.
    fn mark_deleted(&self, id: HouseholdId, now: DateTime<Utc>) -> DomainResult<Household>;

    /// Lookup by id, soft-deleted rows included.
    fn find_by_id(&self, id: HouseholdId) -> DomainResult<Option<Household>>;

    /// Live households, ascending id.
    fn list_active(&self) -> DomainResult<Vec<Household>>;

    fn exists_by_registration_number(&self, registration_number: &str) -> DomainResult<bool>;
}

pub trait CitizenRepository: Send + Sync {
    fn insert(&self, draft: CitizenDraft, now: DateTime<Utc>) -> DomainResult<Citizen>;

    fn save(&self, citizen: Citizen) -> DomainResult<()>;

    /// Remove and return the citizen, `None` if it did not exist.
    fn remove(&self, id: CitizenId) -> DomainResult<Option<Citizen>>;

    fn find_by_id(&self, id: CitizenId) -> DomainResult<Option<Citizen>>;

    /// All citizens, ascending id.
    fn list(&self) -> DomainResult<Vec<Citizen>>;

    /// Members of one household, ascending id.
    fn list_by_household(&self, household_id: HouseholdId) -> DomainResult<Vec<Citizen>>;

    fn count_by_household(&self, household_id: HouseholdId) -> DomainResult<usize>;
}

pub trait ChangeRecordRepository: Send + Sync {
    fn insert(&self, draft: ChangeRecordDraft, actor: &Actor, now: DateTime<Utc>) -> DomainResult<ChangeRecord>;

    fn save(&self, record: ChangeRecord) -> DomainResult<()>;

    fn remove(&self, id: ChangeRecordId) -> DomainResult<Option<ChangeRecord>>;

    fn find_by_id(&self, id: ChangeRecordId) -> DomainResult<Option<ChangeRecord>>;

    /// All records, ascending id.
    fn list(&self) -> DomainResult<Vec<ChangeRecord>>;
}
