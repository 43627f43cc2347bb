//! Session gate: the login flag derived from the persisted token.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app shows one of two view trees. With a token in storage the user sees
//! the order tabs; without one, the login screen. The token is never checked
//! for freshness here; the backend rejects stale tokens on the next
//! authorized call.
//!
//! INVARIANTS
//! ==========
//! - `is_logged_in()` is true only after a token has been persisted.
//! - `logout()` always leaves the gate logged out with the token removed,
//!   whether or not the backend could be told.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::api::Backend;
use crate::error::ClientError;
use crate::storage::{AUTH_TOKEN_KEY, KeyValueStore, StorageError};

/// Which view tree the app renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Authenticated,
}

/// Login flag plus the store it is derived from. Not `Debug`: it holds the token.
pub struct SessionGate<S> {
    store: S,
    token: Option<String>,
}

impl<S: KeyValueStore> SessionGate<S> {
    /// Restore the session from `store`. An empty stored token counts as none.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    pub fn hydrate(store: S) -> Result<Self, StorageError> {
        let token = store.get_item(AUTH_TOKEN_KEY)?.filter(|token| !token.is_empty());
        tracing::debug!(logged_in = token.is_some(), "session hydrated");
        Ok(Self { store, token })
    }

    /// Like [`SessionGate::hydrate`], but an unreadable store starts the app
    /// logged out instead of failing.
    pub fn restore(store: S) -> Self {
        let token = match store.get_item(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "cannot read persisted session; starting logged out");
                None
            }
        };
        Self { store, token }
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn view(&self) -> View {
        if self.is_logged_in() { View::Authenticated } else { View::Login }
    }

    /// Persist `token` and mark the session logged in.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] for an empty token, which would read
    /// back as logged out, and [`ClientError::Storage`] if the token cannot be
    /// persisted. Either way the gate is left unchanged.
    pub fn login(&mut self, token: &str) -> Result<(), ClientError> {
        if token.is_empty() {
            return Err(ClientError::Decode("empty session token".to_owned()));
        }
        self.store.set_item(AUTH_TOKEN_KEY, token)?;
        self.token = Some(token.to_owned());
        tracing::info!("session started");
        Ok(())
    }

    /// Tell the backend (best effort), then drop the local session.
    pub async fn logout<B>(&mut self, backend: &B)
    where
        B: Backend + ?Sized,
    {
        if let Some(token) = self.token.as_deref() {
            if let Err(e) = backend.logout(token).await {
                tracing::warn!(error = %e, "backend logout failed; clearing local session anyway");
            }
        }
        if let Err(e) = self.store.remove_item(AUTH_TOKEN_KEY) {
            tracing::error!(error = %e, "failed to remove persisted token");
        }
        self.token = None;
        tracing::info!("session ended");
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
