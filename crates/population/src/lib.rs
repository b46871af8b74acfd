//! Population domain: households, citizens and population-change records.
//!
//! Pure domain rules (validation, state transitions). No IO, no HTTP, no
//! storage; identifiers are handed in by the repository layer.

pub mod change_record;
pub mod citizen;
pub mod household;

pub use change_record::{ChangeKind, ChangeRecord, ChangeRecordDraft};
pub use citizen::{Citizen, CitizenDraft, Gender};
pub use household::{Household, HouseholdDraft};

pub(crate) fn required_text(field: &str, value: &str, max_len: usize) -> dancu_core::DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(dancu_core::DomainError::validation(format!("{field} cannot be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(dancu_core::DomainError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
