//! Application services: validation, persistence and change notification.
//!
//! Every household/citizen mutation follows the same order: validate, write
//! through the repository, and only after the write returned `Ok` hand the
//! change to the [`ChangeNotifier`](dancu_events::ChangeNotifier). A failed
//! mutation publishes nothing.

pub mod change_record;
pub mod citizen;
pub mod household;

pub use change_record::ChangeRecordService;
pub use citizen::CitizenService;
pub use household::HouseholdService;
