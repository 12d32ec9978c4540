//! Admin authorization.
//!
//! Sessions are issued by an external identity provider; this module only asks it who a
//! bearer token belongs to and whether that principal carries the admin claim.

mod gate;
mod tokens;

pub use gate::{require_admin, UNAUTHORIZED_MESSAGE};
pub use tokens::StaticTokenProvider;

use serde::{Deserialize, Serialize};

/// Authenticated caller as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub subject: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the token does not map to a live session.
    fn resolve(&self, token: &str) -> Result<Option<Principal>, IdentityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}
