use std::str::FromStr;

use axum::response::Response;

use dancu_auth::{CommandAuthorization, Permission};
use dancu_core::DomainError;

use crate::app::errors;
use crate::context::PrincipalContext;

/// Associates the permissions a write needs with its payload.
pub struct CmdAuth<C> {
    pub inner: C,
    pub required: Vec<Permission>,
}

impl<C> CommandAuthorization for CmdAuth<C> {
    fn required_permissions(&self) -> &[Permission] {
        &self.required
    }
}

/// Authorize `inner` for the caller and hand it back, or a 403 response.
pub fn guard<C>(principal: &PrincipalContext, permission: &'static str, inner: C) -> Result<C, Response> {
    let cmd = CmdAuth {
        inner,
        required: vec![Permission::new(permission)],
    };
    crate::authz::authorize_command(principal, &cmd).map_err(|e| {
        tracing::info!(user = principal.username(), permission, "write denied");
        errors::forbidden(e)
    })?;
    Ok(cmd.inner)
}

/// Parse a path id, answering 400 `invalid_id` on failure.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse().map_err(errors::domain_error_to_response)
}
