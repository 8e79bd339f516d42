//! One-shot startup validation of the persisted credential.
//!
//! ```text
//! Start (is_loading) ──no credential──────────────► Unauthenticated
//!        │
//!        └─credential─► decode ──ok──────────────► Authenticated
//!                              └─any error────────► Unauthenticated (store cleared)
//! ```
//!
//! A result is only applied if the session generation is unchanged since the
//! decode was issued; otherwise the run reports `Superseded`.
//!
//! There is no retry: a transport failure at startup is indistinguishable
//! from a rejected credential and both force a clean logout.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::credential::{Credential, UserIdentity};
use crate::state::Session;

/// Server-side credential decoding, supplied by the API client.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolve the identity behind `token`.
    async fn decode_identity(&self, token: &Credential) -> Result<UserIdentity, Self::Error>;
}

/// How the startup window was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// Nothing persisted; no network call was made.
    NoCredential,
    Authenticated(UserIdentity),
    /// The persisted credential could not be validated and was discarded.
    Rejected,
    /// A previous run already settled the session; nothing was done.
    AlreadySettled,
    /// The session changed (logout, forced expiry or a new login) while the
    /// credential was being validated; the result was discarded.
    Superseded,
}

/// Resolves `Session::is_loading` exactly once.
#[derive(Debug)]
pub struct SessionInitializer {
    session: Session,
    started: AtomicBool,
}

impl SessionInitializer {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session, started: AtomicBool::new(false) }
    }

    /// Validate the persisted credential and settle the session.
    ///
    /// Only the first call does any work; later calls return
    /// [`InitOutcome::AlreadySettled`] without touching state or network.
    pub async fn run<S>(&self, source: &S) -> InitOutcome
    where
        S: IdentitySource + ?Sized,
    {
        if self.started.swap(true, Ordering::SeqCst) {
            return InitOutcome::AlreadySettled;
        }

        let Some(token) = self.session.stored_token() else {
            tracing::debug!("no persisted credential");
            self.session.settle(self.session.generation(), None, None);
            return InitOutcome::NoCredential;
        };

        let generation = self.session.generation();
        match source.decode_identity(&token).await {
            Ok(user) => {
                if !self.session.settle(generation, Some(token), Some(user.clone())) {
                    return InitOutcome::Superseded;
                }
                tracing::info!(user_id = %user.id, "persisted credential accepted");
                InitOutcome::Authenticated(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "persisted credential failed validation; logging out");
                // A 401 during validation may already have logged out; that
                // still counts as a rejection.
                if self.session.settle(generation, None, None) || self.session.snapshot().is_cleared() {
                    InitOutcome::Rejected
                } else {
                    InitOutcome::Superseded
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
