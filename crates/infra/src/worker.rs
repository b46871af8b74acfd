//! Background consumer for asynchronous event dispatch.

use dancu_events::{ChangeEvent, ChangeEventHandler, Event, Subscription};

/// Drive `handler` from `subscription` on the blocking thread pool.
///
/// Handler errors are logged and the loop keeps going: a failed
/// recalculation must not stop later events from being processed. The task
/// ends once every publisher behind the subscription is gone.
pub fn spawn_listener_worker<H>(subscription: Subscription<ChangeEvent>, handler: H) -> tokio::task::JoinHandle<()>
where
    H: ChangeEventHandler + 'static,
{
    tokio::task::spawn_blocking(move || {
        tracing::info!(handler = handler.name(), "change listener started");
        while let Ok(event) = subscription.recv() {
            if let Err(error) = handler.handle(&event) {
                tracing::warn!(
                    handler = handler.name(),
                    event_type = event.event_type(),
                    %event,
                    %error,
                    "change handler failed"
                );
            }
        }
        tracing::info!(handler = handler.name(), "change listener stopped");
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use dancu_core::HouseholdId;
    use dancu_events::{ChangeOperation, EventBus, HandlerError, InMemoryEventBus};

    use super::*;

    #[derive(Default)]
    struct Flaky {
        handled: Mutex<Vec<ChangeEvent>>,
    }

    impl ChangeEventHandler for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn handle(&self, event: &ChangeEvent) -> Result<(), HandlerError> {
            self.handled.lock().unwrap().push(*event);
            if event.operation() == ChangeOperation::Update {
                return Err(HandlerError::new("transient"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn worker_survives_handler_errors_and_stops_with_the_bus() {
        let bus = InMemoryEventBus::new();
        let handler = Arc::new(Flaky::default());
        let worker = spawn_listener_worker(bus.subscribe(), handler.clone());

        for op in [ChangeOperation::Create, ChangeOperation::Update, ChangeOperation::Delete] {
            bus.publish(ChangeEvent::household(HouseholdId::new(1), op)).unwrap();
        }
        drop(bus);
        worker.await.unwrap();

        let ops: Vec<_> = handler.handled.lock().unwrap().iter().map(|e| e.operation()).collect();
        assert_eq!(
            ops,
            vec![ChangeOperation::Create, ChangeOperation::Update, ChangeOperation::Delete]
        );
    }
}
