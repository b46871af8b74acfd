use dancu_core::UserId;

use crate::{Permission, Role, authorize::role_permissions};

/// A fully resolved principal for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub username: String,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

impl Principal {
    /// Resolve effective permissions from the role policy.
    pub fn from_roles(user_id: UserId, username: impl Into<String>, roles: Vec<Role>) -> Self {
        let mut permissions: Vec<Permission> = roles.iter().flat_map(|r| role_permissions(r.as_str())).collect();
        permissions.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        permissions.dedup();

        Self {
            user_id,
            username: username.into(),
            roles,
            permissions,
        }
    }
}
