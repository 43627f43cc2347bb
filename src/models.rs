//! Wire DTOs for the shop backend and their display helpers.
//!
//! DESIGN
//! ======
//! Field names match the backend's JSON exactly. Numeric fields accept any
//! integer-compatible JSON number because the backend's serializer is not
//! consistent about emitting `1` vs `1.0`.

#[cfg(test)]
#[path = "models_test.rs"]
mod models_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Country code prepended to every phone number sent to the backend.
pub const COUNTRY_CODE: &str = "55";

/// The only attachment format the backend accepts.
pub const ATTACHMENT_EXTENSION: &str = "png";

// =============================================================================
// REQUESTS
// =============================================================================

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub phone_number: String,
    pub password: String,
    pub name: String,
    pub address: String,
}

/// Body of `POST /api/order/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    pub amount: u32,
    pub attachment_extension: String,
    pub attachment_base64: String,
}

impl CreateOrderRequest {
    /// Order for `amount` boxes with a base64-encoded PNG receipt.
    #[must_use]
    pub fn png(amount: u32, attachment_base64: String) -> Self {
        Self { amount, attachment_extension: ATTACHMENT_EXTENSION.to_owned(), attachment_base64 }
    }
}

/// Prefix a locally typed phone number with the country code.
#[must_use]
pub fn international_phone(local: &str) -> String {
    format!("{COUNTRY_CODE}{local}")
}

// =============================================================================
// ORDER
// =============================================================================

/// Fulfillment progress of an order, as assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderState {
    Submitted,
    Received,
    Delivered,
    /// A code this client does not know. Kept so the order still lists.
    Other(i64),
}

impl From<i64> for OrderState {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Submitted,
            1 => Self::Received,
            2 => Self::Delivered,
            other => Self::Other(other),
        }
    }
}

impl From<OrderState> for i64 {
    fn from(state: OrderState) -> Self {
        match state {
            OrderState::Submitted => 0,
            OrderState::Received => 1,
            OrderState::Delivered => 2,
            OrderState::Other(code) => code,
        }
    }
}

/// Colored status pill shown next to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub color: &'static str,
}

impl OrderState {
    /// Badge for states the customer is told about. Submitted orders have none.
    #[must_use]
    pub fn badge(self) -> Option<Badge> {
        match self {
            Self::Received => Some(Badge { label: "Recebido", color: "#f2f2a7" }),
            Self::Delivered => Some(Badge { label: "Entregue", color: "#a7f2a7" }),
            Self::Submitted | Self::Other(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for OrderState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_i64_from_number(deserializer).map(Self::from)
    }
}

impl Serialize for OrderState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(i64::from(*self))
    }
}

/// An order as returned by `GET /api/order/list-my`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Creation timestamp, ISO-8601.
    pub date: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: u32,
    pub state: OrderState,
}

impl Order {
    /// `"3 Caixas de Brigadeiro"`, singular for one box.
    #[must_use]
    pub fn title(&self) -> String {
        let plural = if self.amount == 1 { "" } else { "s" };
        format!("{} Caixa{plural} de Brigadeiro", self.amount)
    }

    /// `"Data: 16/10/2026, 14:05"` in the given offset.
    #[must_use]
    pub fn date_line(&self, offset: UtcOffset) -> String {
        format!("Data: {}", format_order_date(&self.date, offset))
    }

    #[must_use]
    pub fn badge(&self) -> Option<Badge> {
        self.state.badge()
    }
}

/// Render a backend timestamp as `dd/mm/yyyy, HH:MM` (24h) in `offset`.
///
/// Timestamps without an offset are taken as UTC. Anything unparseable is
/// returned unchanged.
#[must_use]
pub fn format_order_date(raw: &str, offset: UtcOffset) -> String {
    let Some(parsed) = parse_timestamp(raw) else {
        return raw.to_owned();
    };
    let local = parsed.to_offset(offset);
    let format = format_description!("[day]/[month]/[year], [hour]:[minute]");
    local.format(&format).unwrap_or_else(|_| raw.to_owned())
}

fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    let naive = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
    match PrimitiveDateTime::parse(raw, &naive) {
        Ok(parsed) => Some(parsed.assume_utc()),
        Err(_) => None,
    }
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

fn deserialize_i64_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => {
            number_to_i64(&number).ok_or_else(|| D::Error::custom("expected integer-compatible number"))
        }
        _ => Err(D::Error::custom("expected number")),
    }
}

fn number_to_i64(number: &serde_json::Number) -> Option<i64> {
    if let Some(int) = number.as_i64() {
        return Some(int);
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    if let Some(float) = number.as_f64()
        && float.is_finite()
        && float.fract() == 0.0
        && float >= i64::MIN as f64
        && float <= i64::MAX as f64
    {
        return Some(float as i64);
    }
    None
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = deserialize_i64_from_number(deserializer)?;
    u32::try_from(raw).map_err(|_| D::Error::custom(format!("amount out of range: {raw}")))
}

/// Order ids arrive as strings from some backends and as integers from others.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        _ => Err(D::Error::custom("expected string or number id")),
    }
}
