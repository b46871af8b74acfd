//! Change events and their in-process delivery.
//!
//! Household and citizen mutations are announced as [`ChangeEvent`]s through a
//! [`ChangeNotifier`]. Delivery is pluggable: an [`InMemoryEventBus`] fans out
//! to channel subscriptions (asynchronous consumers), while a
//! [`HandlerRegistry`] runs registered handlers on the publishing thread.

pub mod bus;
pub mod event;
pub mod handler;
pub mod in_memory_bus;
pub mod notifier;
pub mod registry;

pub use bus::{EventBus, Subscription};
pub use event::{ChangeEvent, ChangeOperation, Event};
pub use handler::{ChangeEventHandler, HandlerError};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use notifier::ChangeNotifier;
pub use registry::{HandlerRegistry, PublishError};
