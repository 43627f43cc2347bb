//! REST client for the shop backend.
//!
//! ARCHITECTURE
//! ============
//! Screens depend on the [`Backend`] trait, never on reqwest directly, so they
//! can be driven by a mock in tests. [`ApiClient`] is the production
//! implementation.
//!
//! ERROR HANDLING
//! ==============
//! A non-success status becomes [`ClientError::Rejected`] carrying the
//! response text, which the order screen shows verbatim. Anything that stops
//! the exchange before a status is read is [`ClientError::Transport`].

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{CreateOrderRequest, LoginRequest, Order, RegisterRequest};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGOUT_PATH: &str = "/api/user/logout";
pub const CREATE_ORDER_PATH: &str = "/api/order/create";
pub const LIST_MY_ORDERS_PATH: &str = "/api/order/list-my";

/// Operations the app performs against the backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Exchange credentials for a session token.
    async fn login(&self, body: &LoginRequest) -> Result<String, ClientError>;

    /// Create an account and return its session token.
    async fn register(&self, body: &RegisterRequest) -> Result<String, ClientError>;

    /// Invalidate `token` server-side.
    async fn logout(&self, token: &str) -> Result<(), ClientError>;

    async fn create_order(&self, token: &str, body: &CreateOrderRequest) -> Result<(), ClientError>;

    /// Orders placed by the token's owner.
    async fn list_my_orders(&self, token: &str) -> Result<Vec<Order>, ClientError>;
}

/// `Authorization` header value for a session token.
#[must_use]
pub fn authorization_value(token: &str) -> String {
    format!("Token {token}")
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

// =============================================================================
// API CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, request_timeout: Duration, connect_timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::new`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_url,
            Duration::from_secs(config.timeouts.request_secs),
            Duration::from_secs(config.timeouts.connect_secs),
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(join_url(&self.base_url, path))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(join_url(&self.base_url, path))
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(path, status = status.as_u16(), "backend responded");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Rejected { status: status.as_u16(), body })
    }

    /// The token is the response text without surrounding whitespace. The
    /// trimmed value is the one the session persists.
    async fn token_from(response: Response) -> Result<String, ClientError> {
        let token = response.text().await?.trim().to_owned();
        if token.is_empty() {
            return Err(ClientError::Decode("empty session token".to_owned()));
        }
        Ok(token)
    }
}

#[async_trait::async_trait]
impl Backend for ApiClient {
    async fn login(&self, body: &LoginRequest) -> Result<String, ClientError> {
        let response = self.send(LOGIN_PATH, self.post(LOGIN_PATH).json(body)).await?;
        Self::token_from(response).await
    }

    async fn register(&self, body: &RegisterRequest) -> Result<String, ClientError> {
        let response = self.send(REGISTER_PATH, self.post(REGISTER_PATH).json(body)).await?;
        Self::token_from(response).await
    }

    async fn logout(&self, token: &str) -> Result<(), ClientError> {
        let request = self.post(LOGOUT_PATH).header(AUTHORIZATION, authorization_value(token));
        self.send(LOGOUT_PATH, request).await?;
        Ok(())
    }

    async fn create_order(&self, token: &str, body: &CreateOrderRequest) -> Result<(), ClientError> {
        let request = self
            .post(CREATE_ORDER_PATH)
            .header(AUTHORIZATION, authorization_value(token))
            .json(body);
        self.send(CREATE_ORDER_PATH, request).await?;
        Ok(())
    }

    async fn list_my_orders(&self, token: &str) -> Result<Vec<Order>, ClientError> {
        let request = self.get(LIST_MY_ORDERS_PATH).header(AUTHORIZATION, authorization_value(token));
        let response = self.send(LIST_MY_ORDERS_PATH, request).await?;
        let raw = response.text().await?;
        serde_json::from_str(&raw).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
