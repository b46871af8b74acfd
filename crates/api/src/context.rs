use dancu_auth::{Principal, Role};
use dancu_core::{Actor, UserId};

/// Authenticated caller of the current request, taken from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
    username: String,
    roles: Vec<Role>,
}

impl PrincipalContext {
    pub fn new(user_id: UserId, username: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            user_id,
            username: username.into(),
            roles,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Identity recorded on audited writes.
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.username.clone())
    }

    pub fn principal(&self) -> Principal {
        Principal::from_roles(self.user_id, self.username.clone(), self.roles.clone())
    }
}
