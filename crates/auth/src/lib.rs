//! Authentication and authorization boundary for `dancu`.
//!
//! Decoupled from HTTP and storage: the API layer turns a bearer token into
//! [`JwtClaims`], builds a [`Principal`] and asks [`authorize`] before any
//! mutation reaches a service.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, CommandAuthorization, authorize, role_permissions};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
pub use permissions::Permission;
pub use principal::Principal;
pub use roles::Role;
