use thiserror::Error;

use crate::event::ChangeEvent;

/// Failure reported by a change-event handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Reacts to change events (e.g. fee recalculation).
///
/// Handlers must be idempotent and must not assume the entity in the event
/// still looks the way it did when the event was published.
pub trait ChangeEventHandler: Send + Sync {
    /// Stable handler name, used in logs and error reports.
    fn name(&self) -> &'static str;

    fn handle(&self, event: &ChangeEvent) -> Result<(), HandlerError>;
}

impl<H> ChangeEventHandler for std::sync::Arc<H>
where
    H: ChangeEventHandler + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn handle(&self, event: &ChangeEvent) -> Result<(), HandlerError> {
        (**self).handle(event)
    }
}
