//! End-to-end flows against an in-process fake of the shop backend.
//!
//! The fake speaks the same wire contract as the real service: plain-text
//! tokens from the auth endpoints, `Authorization: Token <t>` on everything
//! else, and a JSON array from the order list.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use brigadeiro::api::{ApiClient, Backend};
use brigadeiro::app::App;
use brigadeiro::attachment::PNG_SIGNATURE;
use brigadeiro::config::{ClientConfig, Timeouts};
use brigadeiro::error::{Alert, ClientError};
use brigadeiro::forms::{LoginForm, SignupForm};
use brigadeiro::screens::{LoginScreen, Outcome, SignupScreen};
use brigadeiro::session::View;
use brigadeiro::storage::{AUTH_TOKEN_KEY, FileStore, KeyValueStore};
use serde_json::{Value, json};
use time::UtcOffset;

const PHONE: &str = "5521912345678";
const PASSWORD: &str = "brigadeiro";
const TOKEN: &str = "tok-abc";

// =============================================================================
// FAKE BACKEND
// =============================================================================

#[derive(Default)]
struct Shop {
    orders: Vec<Value>,
    created: Vec<Value>,
    logouts: Vec<String>,
    registrations: Vec<Value>,
}

type SharedShop = Arc<Mutex<Shop>>;

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Token {TOKEN}");
    headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(expected.as_str())
}

async fn login(Json(body): Json<Value>) -> (StatusCode, String) {
    if body["phone_number"] == PHONE && body["password"] == PASSWORD {
        (StatusCode::OK, TOKEN.to_owned())
    } else {
        (StatusCode::UNAUTHORIZED, "invalid credentials".to_owned())
    }
}

async fn register(State(shop): State<SharedShop>, Json(body): Json<Value>) -> (StatusCode, String) {
    shop.lock().unwrap().registrations.push(body);
    (StatusCode::OK, format!("{TOKEN}\n"))
}

async fn logout(State(shop): State<SharedShop>, headers: HeaderMap) -> StatusCode {
    let value = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()).unwrap_or_default();
    shop.lock().unwrap().logouts.push(value.to_owned());
    StatusCode::NO_CONTENT
}

async fn create_order(
    State(shop): State<SharedShop>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, String::new());
    }
    if body["amount"].as_u64().unwrap_or(0) > 20 {
        return (StatusCode::BAD_REQUEST, "Quantidade indisponível".to_owned());
    }
    let mut shop = shop.lock().unwrap();
    let id = shop.orders.len() + 1;
    let amount = body["amount"].clone();
    shop.orders.push(json!({ "id": id, "date": "2026-10-16T17:05:00Z", "amount": amount, "state": 0 }));
    shop.created.push(body);
    (StatusCode::OK, String::new())
}

async fn list_my(State(shop): State<SharedShop>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "invalid token" })));
    }
    (StatusCode::OK, Json(Value::Array(shop.lock().unwrap().orders.clone())))
}

async fn spawn_shop(shop: SharedShop) -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/user/logout", post(logout))
        .route("/api/order/create", post(create_order))
        .route("/api/order/list-my", get(list_my))
        .with_state(shop);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

fn seeded_shop() -> SharedShop {
    let shop = Shop {
        // Whole-number floats, as some serializers emit them.
        orders: vec![json!({ "id": 7, "date": "2026-10-01T12:30:00Z", "amount": 2.0, "state": 2.0 })],
        ..Shop::default()
    };
    Arc::new(Mutex::new(shop))
}

// =============================================================================
// HARNESS
// =============================================================================

fn config(api_url: &str, storage_path: &Path) -> ClientConfig {
    ClientConfig {
        api_url: api_url.to_owned(),
        unit_price: 25,
        pix_key: Some("loja@example.com".to_owned()),
        storage_path: storage_path.to_path_buf(),
        display_offset: UtcOffset::from_hms(-3, 0, 0).unwrap(),
        timeouts: Timeouts { request_secs: 5, connect_secs: 5 },
    }
}

fn start(api_url: &str, storage_path: &Path) -> App<FileStore, ApiClient> {
    let config = config(api_url, storage_path);
    let backend = ApiClient::from_config(&config).unwrap();
    App::start(FileStore::new(storage_path), backend, config)
}

fn credentials(password: &str) -> LoginScreen {
    LoginScreen::new(LoginForm { phone: "21912345678".to_owned(), password: password.to_owned() })
}

fn receipt(dir: &Path) -> PathBuf {
    let path = dir.join("comprovante.png");
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(b"IHDR");
    std::fs::write(&path, bytes).unwrap();
    path
}

// =============================================================================
// FLOWS
// =============================================================================

#[tokio::test]
async fn login_persists_token_across_restarts() {
    let url = spawn_shop(seeded_shop()).await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");

    let mut app = start(&url, &storage);
    assert_eq!(app.view(), View::Login);
    assert_eq!(app.login(&credentials(PASSWORD)).await, Outcome::LoggedIn);

    let restarted = start(&url, &storage);
    assert_eq!(restarted.view(), View::Authenticated);
    assert_eq!(restarted.session().token(), Some(TOKEN));
}

#[tokio::test]
async fn bad_credentials_alert_and_store_nothing() {
    let url = spawn_shop(seeded_shop()).await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let mut app = start(&url, &storage);

    let outcome = app.login(&credentials("errada123")).await;

    assert_eq!(
        outcome,
        Outcome::Alert(Alert::new("Falha no login", "Por favor verifique suas credenciais e tente novamente."))
    );
    assert_eq!(app.view(), View::Login);
    assert!(!storage.exists());
}

#[tokio::test]
async fn signup_sends_prefixed_phone_and_trims_token() {
    let shop = seeded_shop();
    let url = spawn_shop(Arc::clone(&shop)).await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = start(&url, &dir.path().join("storage.json"));
    let screen = SignupScreen::new(SignupForm {
        phone: "21912345678".to_owned(),
        password: PASSWORD.to_owned(),
        confirm_password: PASSWORD.to_owned(),
        name: "Bia".to_owned(),
        address: "Av. Atlântica, 1702".to_owned(),
    });

    assert_eq!(app.signup(&screen).await, Outcome::LoggedIn);

    assert_eq!(app.session().token(), Some(TOKEN));
    let registrations = shop.lock().unwrap().registrations.clone();
    assert_eq!(
        registrations,
        vec![json!({ "phone_number": PHONE, "password": PASSWORD, "name": "Bia", "address": "Av. Atlântica, 1702" })]
    );
}

#[tokio::test]
async fn order_then_list_shows_new_order() {
    let shop = seeded_shop();
    let url = spawn_shop(Arc::clone(&shop)).await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = start(&url, &dir.path().join("storage.json"));
    app.login(&credentials(PASSWORD)).await;

    let mut order = app.new_order_screen();
    order.form.amount = "3".to_owned();
    order.select_attachment(&receipt(dir.path())).unwrap();
    assert_eq!(order.price_line().as_deref(), Some("Valor: R$ 75"));
    assert_eq!(app.place_order(&order).await.unwrap(), Outcome::OrderPlaced);

    let created = shop.lock().unwrap().created.clone();
    assert_eq!(created[0]["amount"], 3);
    assert_eq!(created[0]["attachment_extension"], "png");
    assert_eq!(created[0]["attachment_base64"], "iVBORw0KGgpJSERS");

    let mut list = app.orders_screen();
    assert_eq!(app.refresh_orders(&mut list).await.unwrap(), None);
    let rows = list.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title, "2 Caixas de Brigadeiro");
    assert_eq!(rows[0].date_line, "Data: 01/10/2026, 09:30");
    assert_eq!(rows[0].badge.map(|b| b.label), Some("Entregue"));
    assert_eq!(rows[1].title, "3 Caixas de Brigadeiro");
    assert_eq!(rows[1].badge, None);
}

#[tokio::test]
async fn rejected_order_shows_backend_text() {
    let url = spawn_shop(seeded_shop()).await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = start(&url, &dir.path().join("storage.json"));
    app.login(&credentials(PASSWORD)).await;

    let mut order = app.new_order_screen();
    order.form.amount = "99".to_owned();
    order.select_attachment(&receipt(dir.path())).unwrap();

    assert_eq!(
        app.place_order(&order).await.unwrap(),
        Outcome::Alert(Alert::new("Falha no pedido", "Quantidade indisponível"))
    );
}

#[tokio::test]
async fn stale_token_keeps_list_without_alert() {
    let url = spawn_shop(seeded_shop()).await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let mut store = FileStore::new(&storage);
    store.set_item(AUTH_TOKEN_KEY, "tok-expired").unwrap();

    let mut app = start(&url, &storage);
    let mut list = app.orders_screen();

    assert_eq!(app.refresh_orders(&mut list).await.unwrap(), None);
    assert!(list.rows().is_empty());
}

#[tokio::test]
async fn logout_tells_backend_and_clears_file() {
    let shop = seeded_shop();
    let url = spawn_shop(Arc::clone(&shop)).await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let mut app = start(&url, &storage);
    app.login(&credentials(PASSWORD)).await;

    assert_eq!(app.logout().await, Outcome::LoggedOut);

    assert_eq!(shop.lock().unwrap().logouts, vec![format!("Token {TOKEN}")]);
    assert_eq!(FileStore::new(&storage).get_item(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(start(&url, &storage).view(), View::Login);
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let client = ApiClient::new(&url, Duration::from_secs(2), Duration::from_secs(2)).unwrap();

    let result = client.list_my_orders(TOKEN).await;

    assert!(matches!(result, Err(ClientError::Transport(_))));
}
