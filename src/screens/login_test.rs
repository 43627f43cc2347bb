use super::*;
use crate::api::test_helpers::{Call, MockBackend, Reply};
use crate::models::LoginRequest;
use crate::storage::{AUTH_TOKEN_KEY, MemoryStore};

fn screen() -> LoginScreen {
    LoginScreen::new(LoginForm { phone: "11987654321".to_owned(), password: "brigadeiro".to_owned() })
}

fn logged_out() -> SessionGate<MemoryStore> {
    SessionGate::restore(MemoryStore::new())
}

#[tokio::test]
async fn success_persists_token_and_logs_in() {
    let backend = MockBackend::new(vec![Reply::Token("tok-1".to_owned())]);
    let mut session = logged_out();

    let outcome = screen().submit(&mut session, &backend).await;

    assert_eq!(outcome, Outcome::LoggedIn);
    assert!(session.is_logged_in());
    assert_eq!(session.store().get_item(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn sends_phone_with_country_code() {
    let backend = MockBackend::new(vec![Reply::Token("tok-1".to_owned())]);
    let mut session = logged_out();

    screen().submit(&mut session, &backend).await;

    assert_eq!(
        backend.calls(),
        vec![Call::Login(LoginRequest {
            phone_number: "5511987654321".to_owned(),
            password: "brigadeiro".to_owned(),
        })]
    );
}

#[tokio::test]
async fn bad_credentials_alert_and_stay_logged_out() {
    let backend = MockBackend::new(vec![Reply::Reject(401, "invalid".to_owned())]);
    let mut session = logged_out();

    let outcome = screen().submit(&mut session, &backend).await;

    assert_eq!(
        outcome,
        Outcome::Alert(Alert::new("Falha no login", "Por favor verifique suas credenciais e tente novamente."))
    );
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn network_failure_shows_try_later() {
    let backend = MockBackend::new(vec![Reply::Offline]);
    let mut session = logged_out();

    let outcome = screen().submit(&mut session, &backend).await;

    assert_eq!(
        outcome,
        Outcome::Alert(Alert::new("Erro", "Falha ao tentar realizar o login. Tente novamente mais tarde."))
    );
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn empty_token_is_not_a_session() {
    let backend = MockBackend::new(vec![Reply::Token(String::new())]);
    let mut session = logged_out();

    let outcome = screen().submit(&mut session, &backend).await;

    assert_eq!(
        outcome,
        Outcome::Alert(Alert::new("Erro", "Falha ao tentar realizar o login. Tente novamente mais tarde."))
    );
    assert!(!session.is_logged_in());
}
