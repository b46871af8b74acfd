//! Shared domain primitives: ids, errors and the acting user.
//!
//! Identifiers, the domain error model and the entity contract. No IO here.

pub mod actor;
pub mod entity;
pub mod error;
pub mod id;

pub use actor::Actor;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ChangeRecordId, CitizenId, HouseholdId, UserId};
