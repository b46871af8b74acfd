//! Change notifier: turns committed mutations into published change events.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dancu_core::{CitizenId, HouseholdId};

use crate::bus::EventBus;
use crate::event::{ChangeEvent, ChangeOperation, Event};

/// Object-safe view of an `EventBus<ChangeEvent>` with its error flattened.
trait ChangePublisher: Send + Sync {
    fn publish_change(&self, event: ChangeEvent) -> Result<(), String>;
}

impl<B> ChangePublisher for B
where
    B: EventBus<ChangeEvent>,
{
    fn publish_change(&self, event: ChangeEvent) -> Result<(), String> {
        self.publish(event).map_err(|e| e.to_string())
    }
}

/// Publishes one change event per committed household/citizen mutation.
///
/// Call only after the write has committed. Publication failures are logged
/// and counted but never returned: the mutation has already happened and
/// must not be unwound because a listener misbehaved.
#[derive(Clone)]
pub struct ChangeNotifier {
    bus: Arc<dyn ChangePublisher>,
    publish_failures: Arc<AtomicU64>,
}

impl ChangeNotifier {
    pub fn new<B>(bus: B) -> Self
    where
        B: EventBus<ChangeEvent> + 'static,
    {
        Self {
            bus: Arc::new(bus),
            publish_failures: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn notify_household_changed(&self, household_id: HouseholdId, operation: ChangeOperation) {
        self.publish(ChangeEvent::household(household_id, operation));
    }

    pub fn notify_citizen_changed(
        &self,
        citizen_id: CitizenId,
        household_id: HouseholdId,
        operation: ChangeOperation,
    ) {
        self.publish(ChangeEvent::citizen(citizen_id, household_id, operation));
    }

    /// Number of publications that failed since startup.
    pub fn publish_failures(&self) -> u64 {
        self.publish_failures.load(Ordering::Relaxed)
    }

    fn publish(&self, event: ChangeEvent) {
        match self.bus.publish_change(event) {
            Ok(()) => {
                tracing::debug!(event_type = event.event_type(), %event, "change event published");
            }
            Err(error) => {
                self.publish_failures.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    event_type = event.event_type(),
                    %event,
                    %error,
                    "change event publication failed; mutation stays committed"
                );
            }
        }
    }
}

impl core::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("publish_failures", &self.publish_failures())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Subscription;
    use crate::in_memory_bus::InMemoryEventBus;

    struct BrokenBus;

    impl EventBus<ChangeEvent> for BrokenBus {
        type Error = crate::in_memory_bus::InMemoryBusError;

        fn publish(&self, _message: ChangeEvent) -> Result<(), Self::Error> {
            Err(crate::in_memory_bus::InMemoryBusError::Poisoned)
        }

        fn subscribe(&self) -> Subscription<ChangeEvent> {
            InMemoryEventBus::new().subscribe()
        }
    }

    #[test]
    fn household_notification_carries_id_and_operation() {
        let bus = Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();
        let notifier = ChangeNotifier::new(bus);

        notifier.notify_household_changed(HouseholdId::new(4), ChangeOperation::Update);

        assert_eq!(
            sub.drain(),
            vec![ChangeEvent::household(HouseholdId::new(4), ChangeOperation::Update)]
        );
    }

    #[test]
    fn citizen_notification_carries_owning_household() {
        let bus = Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();
        let notifier = ChangeNotifier::new(bus);

        notifier.notify_citizen_changed(CitizenId::new(8), HouseholdId::new(2), ChangeOperation::Delete);

        assert_eq!(
            sub.drain(),
            vec![ChangeEvent::citizen(CitizenId::new(8), HouseholdId::new(2), ChangeOperation::Delete)]
        );
    }

    #[test]
    fn publication_failure_is_counted_not_raised() {
        let notifier = ChangeNotifier::new(BrokenBus);

        notifier.notify_household_changed(HouseholdId::new(1), ChangeOperation::Create);
        notifier.notify_household_changed(HouseholdId::new(1), ChangeOperation::Delete);

        assert_eq!(notifier.publish_failures(), 2);
    }
}
