use thiserror::Error;

use crate::{Permission, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Command-side authorization contract (checked before a service is called).
pub trait CommandAuthorization {
    fn required_permissions(&self) -> &[Permission];
}

/// Pure policy check: does the principal hold `required` (or the wildcard)?
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let granted = principal
        .permissions
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Static role → permission policy.
pub fn role_permissions(role: &str) -> Vec<Permission> {
    match role {
        "admin" => vec![Permission::new("*")],
        "to_truong" | "to_pho" => vec![
            Permission::new(Permission::HOUSEHOLDS_WRITE),
            Permission::new(Permission::CITIZENS_WRITE),
            Permission::new(Permission::CHANGE_RECORDS_WRITE),
        ],
        // Accountants only read population data; fees are derived.
        "ke_toan" => Vec::new(),
        _ => Vec::new(),
    }
}
