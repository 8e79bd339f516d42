//! Process-wide session state.
//!
//! DESIGN
//! ======
//! `Session` is a cheap, clonable handle over one `watch` channel. It is
//! constructed explicitly and passed to every consumer (API client, guards,
//! CLI) so tests can build isolated sessions. Only the operations below
//! write the state; each runs as a single `send_modify`/`send_if_modified`,
//! so observers never see a half-applied change.
//!
//! `is_authenticated` is derived (`token && user`) rather than stored, which
//! makes the "authenticated iff token and user" invariant hold by
//! construction.
//!
//! GENERATIONS
//! ===========
//! Every credential change bumps `generation`. Identity results that arrive
//! after an await carry the generation they were requested under and are
//! dropped when it no longer matches, so a late success cannot resurrect a
//! session that was logged out in the meantime.

use std::sync::Arc;

use tokio::sync::watch;

use crate::credential::{Credential, UserIdentity};
use crate::token_store::TokenStore;

/// Point-in-time view of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token: Option<Credential>,
    pub user: Option<UserIdentity>,
    /// True only until the startup validation settles.
    pub is_loading: bool,
    pub generation: u64,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Fully logged-out state (`token`, `user` absent).
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.token.is_none() && self.user.is_none()
    }
}

/// Shared handle to the session state and its token store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    state: Arc<watch::Sender<SessionSnapshot>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("state", &*self.state.borrow()).finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session from whatever the store currently holds.
    ///
    /// The token is loaded but not trusted: `is_loading` stays true and
    /// `is_authenticated` false until [`crate::SessionInitializer`] settles.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let initial = SessionSnapshot { token: store.read(), user: None, is_loading: true, generation: 0 };
        let (state, _) = watch::channel(initial);
        Self { store, state: Arc::new(state) }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<Credential> {
        self.state.borrow().token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserIdentity> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Replace the credential, persisting it (or clearing the store on `None`).
    pub fn set_token(&self, token: Option<Credential>) {
        match &token {
            Some(t) => self.store.write(t),
            None => self.store.clear(),
        }
        self.state.send_if_modified(|s| {
            if s.token == token {
                return false;
            }
            s.token = token;
            s.generation += 1;
            true
        });
    }

    /// Set or clear the identity. Authentication follows from token + user.
    pub fn set_user(&self, user: Option<UserIdentity>) {
        self.state.send_if_modified(|s| {
            if s.user == user {
                return false;
            }
            s.user = user;
            true
        });
    }

    /// Set the identity only if the credential has not changed since
    /// `generation` was observed. Returns whether the user was applied.
    pub fn set_user_for(&self, generation: u64, user: UserIdentity) -> bool {
        let applied = self.state.send_if_modified(|s| {
            if s.generation != generation || s.token.is_none() {
                return false;
            }
            s.user = Some(user);
            true
        });
        if !applied {
            tracing::debug!(generation, "dropping identity for a superseded session");
        }
        applied
    }

    /// Adopt a freshly issued credential and return its generation.
    ///
    /// Any identity from a previous credential is dropped; the caller
    /// fetches the new one and applies it with [`Session::set_user_for`].
    pub fn login(&self, token: Credential) -> u64 {
        self.store.write(&token);
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.token = Some(token);
            s.user = None;
            s.generation += 1;
            generation = s.generation;
        });
        tracing::info!(generation, "session credential issued");
        generation
    }

    /// Clear credential and identity. Safe to call when already logged out:
    /// the state and its observers are left untouched.
    pub fn logout(&self) {
        self.store.clear();
        let cleared = self.state.send_if_modified(|s| {
            if s.is_cleared() {
                return false;
            }
            s.token = None;
            s.user = None;
            s.generation += 1;
            true
        });
        if cleared {
            tracing::info!("session cleared");
        }
    }

    /// Credential as currently persisted, bypassing the in-memory copy.
    pub(crate) fn stored_token(&self) -> Option<Credential> {
        self.store.read()
    }

    /// Resolve the startup window. Only [`crate::SessionInitializer`] calls this.
    ///
    /// `generation` is the one observed before the credential was validated.
    /// If the session changed meanwhile (logout, forced expiry, a new login)
    /// only `is_loading` is cleared and `false` is returned.
    pub(crate) fn settle(&self, generation: u64, token: Option<Credential>, user: Option<UserIdentity>) -> bool {
        let mut applied = false;
        self.state.send_modify(|s| {
            s.is_loading = false;
            if s.generation != generation {
                return;
            }
            if token.is_none() {
                self.store.clear();
            }
            if s.token != token {
                s.generation += 1;
            }
            s.token = token;
            s.user = user;
            applied = true;
        });
        if !applied {
            tracing::debug!(generation, "startup validation superseded");
        }
        applied
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
