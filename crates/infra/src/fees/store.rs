use std::collections::HashMap;
use std::sync::RwLock;

use dancu_core::{DomainError, DomainResult, HouseholdId};

use super::HouseholdFee;

/// Storage for the fee read model.
pub trait FeeStore: Send + Sync {
    fn get(&self, household_id: HouseholdId) -> DomainResult<Option<HouseholdFee>>;
    fn upsert(&self, fee: HouseholdFee) -> DomainResult<()>;
    fn remove(&self, household_id: HouseholdId) -> DomainResult<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryFeeStore {
    inner: RwLock<HashMap<HouseholdId, HouseholdFee>>,
}

impl InMemoryFeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::storage("fee store lock poisoned")
}

impl FeeStore for InMemoryFeeStore {
    fn get(&self, household_id: HouseholdId) -> DomainResult<Option<HouseholdFee>> {
        Ok(self.inner.read().map_err(poisoned)?.get(&household_id).cloned())
    }

    fn upsert(&self, fee: HouseholdFee) -> DomainResult<()> {
        self.inner.write().map_err(poisoned)?.insert(fee.household_id, fee);
        Ok(())
    }

    fn remove(&self, household_id: HouseholdId) -> DomainResult<()> {
        self.inner.write().map_err(poisoned)?.remove(&household_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;

    fn fee(id: i64) -> HouseholdFee {
        HouseholdFee {
            household_id: HouseholdId::new(id),
            member_count: 1,
            monthly_amount: 6_000,
            annual_amount: 72_000,
            recalculated_at: Utc::now(),
        }
    }

    #[test]
    fn upsert_replaces_and_remove_clears() {
        let store = InMemoryFeeStore::new();
        store.upsert(fee(1)).unwrap();
        let mut newer = fee(1);
        newer.member_count = 2;
        store.upsert(newer).unwrap();

        assert_eq!(store.get(HouseholdId::new(1)).unwrap().unwrap().member_count, 2);
        store.remove(HouseholdId::new(1)).unwrap();
        assert!(store.get(HouseholdId::new(1)).unwrap().is_none());
    }

    #[test]
    fn poisoned_store_reports_storage_errors() {
        let store = Arc::new(InMemoryFeeStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the fee store");
        })
        .join();

        assert!(matches!(store.upsert(fee(1)), Err(DomainError::Storage(_))));
        assert!(matches!(store.remove(HouseholdId::new(1)), Err(DomainError::Storage(_))));
        assert!(matches!(store.get(HouseholdId::new(1)), Err(DomainError::Storage(_))));
    }
}
