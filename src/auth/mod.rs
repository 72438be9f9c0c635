//! Authentication boundary
//!
//! Opaque bearer-token verification that yields a user identity.
//! Token issuance is an external collaborator.

mod middleware;
mod token;

pub use middleware::CurrentUser;
pub use token::{AuthContext, create_access_token, verify_access_token};
