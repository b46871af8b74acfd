use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use dancu_core::{CitizenId, HouseholdId};
use dancu_events::{ChangeEvent, ChangeEventHandler, ChangeOperation, HandlerError};

use super::{FeePolicy, FeeStore, HouseholdFee};
use crate::repository::{CitizenRepository, HouseholdRepository};

/// Recomputes household fees whenever households or their members change.
pub struct FeeRecalculationListener {
    households: Arc<dyn HouseholdRepository>,
    citizens: Arc<dyn CitizenRepository>,
    store: Arc<dyn FeeStore>,
    policy: FeePolicy,
    // Last household seen per citizen, so a move also refreshes the old one.
    citizen_households: Mutex<HashMap<CitizenId, HouseholdId>>,
    // Held across read + write so a stale count never overwrites a newer one.
    recalculation: Mutex<()>,
}

impl FeeRecalculationListener {
    pub fn new(
        households: Arc<dyn HouseholdRepository>,
        citizens: Arc<dyn CitizenRepository>,
        store: Arc<dyn FeeStore>,
        policy: FeePolicy,
    ) -> Self {
        Self {
            households,
            citizens,
            store,
            policy,
            citizen_households: Mutex::new(HashMap::new()),
            recalculation: Mutex::new(()),
        }
    }

    /// Recompute (or drop) the fee for one household from current state.
    pub fn recalculate(&self, household_id: HouseholdId) -> Result<(), HandlerError> {
        let _serial = self
            .recalculation
            .lock()
            .map_err(|_| HandlerError::new("fee recalculation lock poisoned"))?;

        let household = self
            .households
            .find_by_id(household_id)
            .map_err(|e| HandlerError::new(format!("household lookup failed: {e}")))?;

        match household {
            Some(h) if h.is_live() => {
                let member_count = self
                    .citizens
                    .count_by_household(household_id)
                    .map_err(|e| HandlerError::new(format!("member count failed: {e}")))?;

                let fee = HouseholdFee {
                    household_id,
                    member_count,
                    monthly_amount: self.policy.monthly_amount(member_count),
                    annual_amount: self.policy.annual_amount(member_count),
                    recalculated_at: Utc::now(),
                };
                tracing::debug!(%household_id, member_count, monthly = fee.monthly_amount, "fee recalculated");
                self.store
                    .upsert(fee)
                    .map_err(|e| HandlerError::new(format!("fee write failed: {e}")))?;
            }
            _ => {
                tracing::debug!(%household_id, "household gone; fee dropped");
                self.store
                    .remove(household_id)
                    .map_err(|e| HandlerError::new(format!("fee removal failed: {e}")))?;
            }
        }
        Ok(())
    }

    fn track_citizen(
        &self,
        citizen_id: CitizenId,
        household_id: HouseholdId,
        operation: ChangeOperation,
    ) -> Result<Option<HouseholdId>, HandlerError> {
        let mut seen = self
            .citizen_households
            .lock()
            .map_err(|_| HandlerError::new("citizen tracking lock poisoned"))?;

        let previous = match operation {
            ChangeOperation::Delete => seen.remove(&citizen_id),
            ChangeOperation::Create | ChangeOperation::Update => seen.insert(citizen_id, household_id),
        };
        Ok(previous.filter(|p| *p != household_id))
    }
}

impl ChangeEventHandler for FeeRecalculationListener {
    fn name(&self) -> &'static str {
        "fees.recalculation"
    }

    fn handle(&self, event: &ChangeEvent) -> Result<(), HandlerError> {
        match *event {
            ChangeEvent::Household { household_id, .. } => self.recalculate(household_id),
            ChangeEvent::Citizen {
                citizen_id,
                household_id,
                operation,
            } => {
                let moved_from = self.track_citizen(citizen_id, household_id, operation)?;
                self.recalculate(household_id)?;
                if let Some(previous) = moved_from {
                    self.recalculate(previous)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread::JoinHandle;
    use std::time::Duration;

    use dancu_core::{DomainError, DomainResult};
    use dancu_population::{Citizen, CitizenDraft, HouseholdDraft};

    use super::*;
    use crate::fees::InMemoryFeeStore;
    use crate::repository::{InMemoryCitizenRepository, InMemoryHouseholdRepository};

    struct Fixture {
        households: Arc<InMemoryHouseholdRepository>,
        citizens: Arc<InMemoryCitizenRepository>,
        store: Arc<InMemoryFeeStore>,
        listener: FeeRecalculationListener,
    }

    fn setup() -> Fixture {
        let households = Arc::new(InMemoryHouseholdRepository::new());
        let citizens = Arc::new(InMemoryCitizenRepository::new());
        let store = Arc::new(InMemoryFeeStore::new());
        let listener = FeeRecalculationListener::new(
            households.clone(),
            citizens.clone(),
            store.clone(),
            FeePolicy::new(1_000),
        );
        Fixture {
            households,
            citizens,
            store,
            listener,
        }
    }

    fn household(fx: &Fixture, number: &str) -> HouseholdId {
        fx.households
            .insert(
                HouseholdDraft {
                    registration_number: number.to_string(),
                    head_name: "Head".to_string(),
                    address: "Addr".to_string(),
                },
                Utc::now(),
            )
            .unwrap()
            .id
    }

    fn member(fx: &Fixture, household_id: HouseholdId) -> CitizenId {
        fx.citizens
            .insert(
                CitizenDraft {
                    household_id,
                    full_name: "Member".to_string(),
                    date_of_birth: None,
                    gender: None,
                    national_id: None,
                    relationship_to_head: None,
                },
                Utc::now(),
            )
            .unwrap()
            .id
    }

    #[test]
    fn household_event_computes_fee_from_member_count() {
        let fx = setup();
        let h = household(&fx, "HK-1");
        member(&fx, h);
        member(&fx, h);

        fx.listener
            .handle(&ChangeEvent::household(h, ChangeOperation::Update))
            .unwrap();

        let fee = fx.store.get(h).unwrap().unwrap();
        assert_eq!(fee.member_count, 2);
        assert_eq!(fee.monthly_amount, 2_000);
        assert_eq!(fee.annual_amount, 24_000);
    }

    #[test]
    fn deleted_household_loses_its_fee() {
        let fx = setup();
        let h = household(&fx, "HK-2");
        fx.listener
            .handle(&ChangeEvent::household(h, ChangeOperation::Create))
            .unwrap();
        assert!(fx.store.get(h).unwrap().is_some());

        fx.households.mark_deleted(h, Utc::now()).unwrap();
        fx.listener
            .handle(&ChangeEvent::household(h, ChangeOperation::Delete))
            .unwrap();

        assert!(fx.store.get(h).unwrap().is_none());
    }

    #[test]
    fn citizen_move_refreshes_both_households() {
        let fx = setup();
        let from = household(&fx, "HK-FROM");
        let to = household(&fx, "HK-TO");
        let c = member(&fx, from);
        fx.listener
            .handle(&ChangeEvent::citizen(c, from, ChangeOperation::Create))
            .unwrap();
        assert_eq!(fx.store.get(from).unwrap().unwrap().member_count, 1);

        let mut row = fx.citizens.find_by_id(c).unwrap().unwrap();
        row.household_id = to;
        fx.citizens.save(row).unwrap();
        fx.listener
            .handle(&ChangeEvent::citizen(c, to, ChangeOperation::Update))
            .unwrap();

        assert_eq!(fx.store.get(from).unwrap().unwrap().member_count, 0);
        assert_eq!(fx.store.get(to).unwrap().unwrap().member_count, 1);
    }

    #[test]
    fn replaying_the_same_event_is_harmless() {
        let fx = setup();
        let h = household(&fx, "HK-3");
        let c = member(&fx, h);
        let ev = ChangeEvent::citizen(c, h, ChangeOperation::Create);

        fx.listener.handle(&ev).unwrap();
        fx.listener.handle(&ev).unwrap();

        assert_eq!(fx.store.get(h).unwrap().unwrap().member_count, 1);
    }

    #[test]
    fn stale_event_for_unknown_household_just_clears() {
        let fx = setup();
        let ghost = HouseholdId::new(77);

        fx.listener
            .handle(&ChangeEvent::household(ghost, ChangeOperation::Update))
            .unwrap();

        assert!(fx.store.get(ghost).unwrap().is_none());
    }

    struct FailingStore;

    impl FeeStore for FailingStore {
        fn get(&self, _: HouseholdId) -> DomainResult<Option<HouseholdFee>> {
            Ok(None)
        }

        fn upsert(&self, _: HouseholdFee) -> DomainResult<()> {
            Err(DomainError::storage("fee store offline"))
        }

        fn remove(&self, _: HouseholdId) -> DomainResult<()> {
            Err(DomainError::storage("fee store offline"))
        }
    }

    #[test]
    fn store_failures_surface_as_handler_errors() {
        let fx = setup();
        let h = household(&fx, "HK-F");
        let listener = FeeRecalculationListener::new(
            fx.households.clone(),
            fx.citizens.clone(),
            Arc::new(FailingStore),
            FeePolicy::default(),
        );

        let err = listener
            .handle(&ChangeEvent::household(h, ChangeOperation::Update))
            .unwrap_err();
        assert!(err.message().contains("fee write failed"), "{err}");

        let err = listener
            .handle(&ChangeEvent::household(HouseholdId::new(404), ChangeOperation::Delete))
            .unwrap_err();
        assert!(err.message().contains("fee removal failed"), "{err}");
    }

    /// Adds a member to the household, from another thread, while the first
    /// recalculation sits between counting and writing.
    struct LateJoiner {
        inner: Arc<InMemoryCitizenRepository>,
        listener: OnceLock<Arc<FeeRecalculationListener>>,
        fired: AtomicBool,
        other: Mutex<Option<JoinHandle<()>>>,
    }

    impl CitizenRepository for LateJoiner {
        fn insert(&self, draft: CitizenDraft, now: chrono::DateTime<Utc>) -> DomainResult<Citizen> {
            self.inner.insert(draft, now)
        }

        fn save(&self, citizen: Citizen) -> DomainResult<()> {
            self.inner.save(citizen)
        }

        fn remove(&self, id: CitizenId) -> DomainResult<Option<Citizen>> {
            self.inner.remove(id)
        }

        fn find_by_id(&self, id: CitizenId) -> DomainResult<Option<Citizen>> {
            self.inner.find_by_id(id)
        }

        fn list(&self) -> DomainResult<Vec<Citizen>> {
            self.inner.list()
        }

        fn list_by_household(&self, household_id: HouseholdId) -> DomainResult<Vec<Citizen>> {
            self.inner.list_by_household(household_id)
        }

        fn count_by_household(&self, household_id: HouseholdId) -> DomainResult<usize> {
            let counted = self.inner.count_by_household(household_id)?;
            if !self.fired.swap(true, Ordering::SeqCst) {
                self.inner.insert(
                    CitizenDraft {
                        household_id,
                        full_name: "Late".to_string(),
                        date_of_birth: None,
                        gender: None,
                        national_id: None,
                        relationship_to_head: None,
                    },
                    Utc::now(),
                )?;
                let listener = self.listener.get().cloned().expect("listener wired");
                let handle = std::thread::spawn(move || listener.recalculate(household_id).unwrap());
                *self.other.lock().unwrap() = Some(handle);
                std::thread::sleep(Duration::from_millis(50));
            }
            Ok(counted)
        }
    }

    #[test]
    fn concurrent_recalculations_settle_on_the_latest_count() {
        let households = Arc::new(InMemoryHouseholdRepository::new());
        let base = Arc::new(InMemoryCitizenRepository::new());
        let store = Arc::new(InMemoryFeeStore::new());
        let citizens = Arc::new(LateJoiner {
            inner: base.clone(),
            listener: OnceLock::new(),
            fired: AtomicBool::new(false),
            other: Mutex::new(None),
        });
        let listener = Arc::new(FeeRecalculationListener::new(
            households.clone(),
            citizens.clone(),
            store.clone(),
            FeePolicy::default(),
        ));
        citizens.listener.set(listener.clone()).ok();

        let h = households
            .insert(
                HouseholdDraft {
                    registration_number: "HK-RACE".to_string(),
                    head_name: "Head".to_string(),
                    address: "Addr".to_string(),
                },
                Utc::now(),
            )
            .unwrap()
            .id;

        listener.recalculate(h).unwrap();
        let other = citizens.other.lock().unwrap().take().unwrap();
        other.join().unwrap();

        assert_eq!(base.count_by_household(h).unwrap(), 1);
        assert_eq!(store.get(h).unwrap().unwrap().member_count, 1);
    }

    #[test]
    fn handling_events_never_touches_population_rows() {
        let fx = setup();
        let h = household(&fx, "HK-RO");
        let c = member(&fx, h);
        let households_before = fx.households.list_active().unwrap();
        let citizens_before = fx.citizens.list().unwrap();

        for ev in [
            ChangeEvent::household(h, ChangeOperation::Delete),
            ChangeEvent::citizen(c, h, ChangeOperation::Delete),
            ChangeEvent::citizen(c, HouseholdId::new(99), ChangeOperation::Update),
        ] {
            fx.listener.handle(&ev).unwrap();
        }

        assert_eq!(fx.households.list_active().unwrap(), households_before);
        assert_eq!(fx.citizens.list().unwrap(), citizens_before);
    }
}
