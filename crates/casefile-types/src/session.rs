//! Session Context
//!
//! Explicit replacement for ambient session globals: the bearer credential,
//! acting user and role are passed into every subsystem constructor instead
//! of being read from hidden storage at each call site. A missing credential
//! must abort client-side, before any network call.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Bearer credential attached to every storage-service request.
    pub bearer_token: String,
    /// Acting user id, stamped onto every write for audit attribution.
    pub actor_id: String,
    pub actor_name: String,
    pub role: String,
}

impl SessionContext {
    pub fn new(
        bearer_token: impl Into<String>,
        actor_id: impl Into<String>,
        actor_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            actor_id: actor_id.into(),
            actor_name: actor_name.into(),
            role: role.into(),
        }
    }

    /// The credential, or `None` when absent. Callers map `None` to their
    /// auth-missing error before touching the network.
    pub fn bearer(&self) -> Option<&str> {
        let token = self.bearer_token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }
}
