//! Login screen.

use super::{Outcome, unreachable_alert};
use crate::api::Backend;
use crate::error::Alert;
use crate::forms::LoginForm;
use crate::session::SessionGate;
use crate::storage::KeyValueStore;

pub const TITLE: &str = "Login";

const REJECTED_TITLE: &str = "Falha no login";
const REJECTED_MESSAGE: &str = "Por favor verifique suas credenciais e tente novamente.";
const UNREACHABLE_MESSAGE: &str = "Falha ao tentar realizar o login. Tente novamente mais tarde.";

#[derive(Debug, Clone, Default)]
pub struct LoginScreen {
    pub form: LoginForm,
}

impl LoginScreen {
    #[must_use]
    pub fn new(form: LoginForm) -> Self {
        Self { form }
    }

    /// Exchange the credentials for a token and start the session.
    pub async fn submit<S, B>(&self, session: &mut SessionGate<S>, backend: &B) -> Outcome
    where
        S: KeyValueStore,
        B: Backend + ?Sized,
    {
        let token = match backend.login(&self.form.to_request()).await {
            Ok(token) => token,
            Err(e) if e.is_rejection() => return Outcome::Alert(Alert::new(REJECTED_TITLE, REJECTED_MESSAGE)),
            Err(e) => return Outcome::Alert(unreachable_alert(&e, UNREACHABLE_MESSAGE)),
        };
        match session.login(&token) {
            Ok(()) => Outcome::LoggedIn,
            Err(e) => Outcome::Alert(unreachable_alert(&e, UNREACHABLE_MESSAGE)),
        }
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;
