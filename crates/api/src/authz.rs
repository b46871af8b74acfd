//! Permission guard applied by handlers before any service call.

use dancu_auth::{AuthzError, CommandAuthorization, authorize};

use crate::context::PrincipalContext;

/// Check every permission the command requires against the caller's roles.
pub fn authorize_command<C: CommandAuthorization>(
    principal: &PrincipalContext,
    command: &C,
) -> Result<(), AuthzError> {
    let principal = principal.principal();

    for perm in command.required_permissions() {
        authorize(&principal, perm)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use dancu_auth::{Permission, Role};
    use dancu_core::UserId;

    use super::*;
    use crate::app::routes::common::CmdAuth;

    fn ctx(role: &'static str) -> PrincipalContext {
        PrincipalContext::new(UserId::new(), "u", vec![Role::new(role)])
    }

    #[test]
    fn leader_may_write_households_but_accountant_may_not() {
        let cmd = CmdAuth {
            inner: (),
            required: vec![Permission::new(Permission::HOUSEHOLDS_WRITE)],
        };

        assert!(authorize_command(&ctx("to_truong"), &cmd).is_ok());
        assert!(authorize_command(&ctx("ke_toan"), &cmd).is_err());
    }

    #[test]
    fn commands_without_requirements_pass() {
        let cmd = CmdAuth {
            inner: (),
            required: Vec::new(),
        };
        assert!(authorize_command(&ctx("ke_toan"), &cmd).is_ok());
    }
}
