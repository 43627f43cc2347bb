//! Signup screen.

use super::{Outcome, unreachable_alert};
use crate::api::Backend;
use crate::error::Alert;
use crate::forms::SignupForm;
use crate::session::SessionGate;
use crate::storage::KeyValueStore;

pub const TITLE: &str = "Registro";

const REJECTED_TITLE: &str = "Falha no cadastro";
const REJECTED_MESSAGE: &str = "Por favor verifique as informações e tente novamente.";
const UNREACHABLE_MESSAGE: &str = "Falha ao tentar realizar o cadastro. Tente novamente mais tarde.";

#[derive(Debug, Clone, Default)]
pub struct SignupScreen {
    pub form: SignupForm,
}

impl SignupScreen {
    #[must_use]
    pub fn new(form: SignupForm) -> Self {
        Self { form }
    }

    /// Validate, register, and start the session with the returned token.
    /// Validation failures never reach the backend.
    pub async fn submit<S, B>(&self, session: &mut SessionGate<S>, backend: &B) -> Outcome
    where
        S: KeyValueStore,
        B: Backend + ?Sized,
    {
        let request = match self.form.validate() {
            Ok(request) => request,
            Err(e) => return Outcome::Alert(e.alert()),
        };
        let token = match backend.register(&request).await {
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
#[path = "signup_test.rs"]
mod signup_test;
