//! User tab. Its only action is logging out.

use super::Outcome;
use crate::api::Backend;
use crate::session::SessionGate;
use crate::storage::KeyValueStore;

pub const TITLE: &str = "Usuário";

#[derive(Debug, Clone, Copy, Default)]
pub struct UserScreen;

impl UserScreen {
    /// Always ends the local session, even when the backend cannot be told.
    pub async fn logout<S, B>(&self, session: &mut SessionGate<S>, backend: &B) -> Outcome
    where
        S: KeyValueStore,
        B: Backend + ?Sized,
    {
        session.logout(backend).await;
        Outcome::LoggedOut
    }
}

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;
