//! Identity provider seam.
//!
//! The provider is passed explicitly to the authed client calls instead of
//! being looked up from process-wide state, so tests can supply their own.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{IdentityError, RequestError};

/// Source of the currently signed-in session, if any.
pub trait IdentityProvider: Send + Sync {
    fn current_session(&self) -> Option<Arc<dyn Session>>;
}

/// A signed-in user able to mint short-lived bearer tokens.
#[async_trait]
pub trait Session: Send + Sync {
    /// Fetch a fresh token. `Ok(None)` means the provider had nothing to give.
    async fn token(&self) -> Result<Option<String>, IdentityError>;
}

/// Resolve a bearer token from `identity`, mapping each way it can fail.
pub async fn fetch_token(identity: &dyn IdentityProvider) -> Result<String, RequestError> {
    let session = identity.current_session().ok_or(RequestError::NotSignedIn)?;
    match session.token().await? {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(RequestError::MissingToken),
    }
}
