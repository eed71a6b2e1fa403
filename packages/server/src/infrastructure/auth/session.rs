//! In-memory session authority.
//!
//! The login flow marks and clears authenticated usernames; the chat surface
//! only asks whether a username is currently authenticated.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{SessionAuthority, Username};

#[derive(Default)]
pub struct InMemorySessionAuthority {
    authenticated: RwLock<HashSet<Username>>,
}

impl InMemorySessionAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `username` as authenticated. Returns `false` if it already was.
    pub async fn sign_in(&self, username: Username) -> bool {
        let inserted = self.authenticated.write().await.insert(username.clone());
        tracing::debug!("Session opened for '{}'", username);
        inserted
    }

    /// Clear the session of `username`. Returns `false` if there was none.
    pub async fn sign_out(&self, username: &Username) -> bool {
        let removed = self.authenticated.write().await.remove(username);
        if removed {
            tracing::debug!("Session closed for '{}'", username);
        }
        removed
    }
}

#[async_trait]
impl SessionAuthority for InMemorySessionAuthority {
    async fn is_authenticated(&self, username: &Username) -> bool {
        self.authenticated.read().await.contains(username)
    }
}
