//! Explicit handler registry with synchronous dispatch.
//!
//! `publish` runs every registered handler on the caller's thread before it
//! returns, so the caller observes handler side effects immediately. Channel
//! subscribers are still fed afterwards.

use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::bus::{EventBus, Subscription};
use crate::event::ChangeEvent;
use crate::handler::ChangeEventHandler;
use crate::in_memory_bus::InMemoryEventBus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("handler registry lock poisoned")]
    Poisoned,

    /// At least one handler failed. Every handler still ran.
    #[error("handler '{handler}' failed: {message} ({failed} handler(s) failed)")]
    Handler {
        handler: String,
        message: String,
        failed: usize,
    },
}

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<Vec<Arc<dyn ChangeEventHandler>>>,
    fanout: InMemoryEventBus<ChangeEvent>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handler: Arc<dyn ChangeEventHandler>) {
        match self.handlers.write() {
            Ok(mut handlers) => {
                tracing::debug!(handler = handler.name(), "registered change handler");
                handlers.push(handler);
            }
            Err(_) => tracing::error!(handler = handler.name(), "handler registry poisoned; handler dropped"),
        }
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers
            .read()
            .map(|hs| hs.iter().map(|h| h.name()).collect())
            .unwrap_or_default()
    }
}

impl core::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

impl EventBus<ChangeEvent> for HandlerRegistry {
    type Error = PublishError;

    fn publish(&self, event: ChangeEvent) -> Result<(), Self::Error> {
        // Snapshot so handlers may register further handlers without deadlocking.
        let handlers: Vec<_> = self.handlers.read().map_err(|_| PublishError::Poisoned)?.clone();

        let mut failures = Vec::new();
        for handler in &handlers {
            if let Err(e) = handler.handle(&event) {
                failures.push((handler.name(), e));
            }
        }

        self.fanout.publish(event).map_err(|_| PublishError::Poisoned)?;

        let failed = failures.len();
        match failures.into_iter().next() {
            None => Ok(()),
            Some((name, err)) => Err(PublishError::Handler {
                handler: name.to_string(),
                message: err.message().to_string(),
                failed,
            }),
        }
    }

    fn subscribe(&self) -> Subscription<ChangeEvent> {
        self.fanout.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use dancu_core::HouseholdId;

    use super::*;
    use crate::event::ChangeOperation;
    use crate::handler::HandlerError;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<ChangeEvent>>,
    }

    impl ChangeEventHandler for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn handle(&self, event: &ChangeEvent) -> Result<(), HandlerError> {
            self.seen.lock().unwrap().push(*event);
            Ok(())
        }
    }

    struct Failing;

    impl ChangeEventHandler for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn handle(&self, _event: &ChangeEvent) -> Result<(), HandlerError> {
            Err(HandlerError::new("boom"))
        }
    }

    fn created(id: i64) -> ChangeEvent {
        ChangeEvent::household(HouseholdId::new(id), ChangeOperation::Create)
    }

    #[test]
    fn handlers_run_before_publish_returns() {
        let registry = HandlerRegistry::new();
        let recorder = Arc::new(Recorder::default());
        registry.register(recorder.clone());

        registry.publish(created(1)).unwrap();

        assert_eq!(recorder.seen.lock().unwrap().as_slice(), &[created(1)]);
    }

    #[test]
    fn failing_handler_does_not_starve_the_others() {
        let registry = HandlerRegistry::new();
        let recorder = Arc::new(Recorder::default());
        registry.register(Arc::new(Failing));
        registry.register(recorder.clone());

        let err = registry.publish(created(2)).unwrap_err();

        assert!(matches!(err, PublishError::Handler { ref handler, failed: 1, .. } if handler == "failing"));
        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn subscribers_still_receive_events() {
        let registry = HandlerRegistry::new();
        let sub = registry.subscribe();

        registry.publish(created(3)).unwrap();

        assert_eq!(sub.drain(), vec![created(3)]);
    }
}
