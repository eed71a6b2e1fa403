//! Authorization collaborators.
//!
//! Both are provided by the surrounding login flow; the broadcast core only
//! consumes them.

use async_trait::async_trait;

use super::{error::TokenError, value_object::Username};

/// Resolves a bearer token to the identity it was issued for.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` and return its identity
    async fn verify(&self, token: &str) -> Result<Username, TokenError>;
}

/// Reports whether an identity currently holds an authenticated session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionAuthority: Send + Sync {
    async fn is_authenticated(&self, username: &Username) -> bool;
}
