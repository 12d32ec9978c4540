use std::collections::HashMap;

use super::{IdentityError, IdentityProvider, Principal};
use crate::config::IdentityConfig;

/// Provider backed by a fixed token table, for local runs and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenProvider {
    sessions: HashMap<String, Principal>,
}

impl StaticTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every configured token maps to an admin principal.
    pub fn from_config(config: &IdentityConfig) -> Self {
        config
            .admin_tokens
            .iter()
            .enumerate()
            .fold(Self::new(), |provider, (index, token)| {
                provider.with_session(
                    token.clone(),
                    Principal {
                        subject: format!("admin-{}", index + 1),
                        email: None,
                        is_admin: true,
                    },
                )
            })
    }

    pub fn with_session(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.sessions.insert(token.into(), principal);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl IdentityProvider for StaticTokenProvider {
    fn resolve(&self, token: &str) -> Result<Option<Principal>, IdentityError> {
        Ok(self.sessions.get(token).cloned())
    }
}
