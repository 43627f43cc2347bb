//! Client-side form validation.
//!
//! Checks here are the ones that must hold before a request is sent: presence
//! and length for signup, a positive amount and a receipt for orders. Anything
//! else is left to the backend.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use crate::attachment::Attachment;
use crate::error::Alert;
use crate::models::{CreateOrderRequest, LoginRequest, RegisterRequest, international_phone};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Amount pre-filled on the order screen.
pub const DEFAULT_AMOUNT: &str = "1";

const SIGNUP_FAILED: &str = "Falha no cadastro";
const ORDER_FAILED: &str = "Falha no pedido";
const CHECK_ORDER: &str = "Verifique os dados do pedido";

// =============================================================================
// LOGIN
// =============================================================================

/// Login has no client-side checks; credentials go straight to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Local number, without country code.
    pub phone: String,
    pub password: String,
}

impl LoginForm {
    #[must_use]
    pub fn to_request(&self) -> LoginRequest {
        LoginRequest { phone_number: international_phone(&self.phone), password: self.password.clone() }
    }
}

// =============================================================================
// SIGNUP
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignupError {
    #[error("all fields are required")]
    MissingFields,
    #[error("password shorter than 8 characters")]
    PasswordTooShort,
    #[error("password confirmation does not match")]
    PasswordMismatch,
}

impl SignupError {
    #[must_use]
    pub fn alert(self) -> Alert {
        let message = match self {
            Self::MissingFields => "Todos os campos devem ser preenchidos.",
            Self::PasswordTooShort => "Senha deve conter pelo menos 8 caracteres.",
            Self::PasswordMismatch => "Confirmação de senha incorreta.",
        };
        Alert::new(SIGNUP_FAILED, message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub address: String,
}

impl SignupForm {
    /// Validate in display order: presence, length, then confirmation.
    ///
    /// # Errors
    ///
    /// Returns the first [`SignupError`] that applies.
    pub fn validate(&self) -> Result<RegisterRequest, SignupError> {
        if [&self.password, &self.name, &self.address, &self.phone].iter().any(|field| field.is_empty()) {
            return Err(SignupError::MissingFields);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SignupError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(SignupError::PasswordMismatch);
        }
        Ok(RegisterRequest {
            phone_number: international_phone(&self.phone),
            password: self.password.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
        })
    }
}

// =============================================================================
// NEW ORDER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OrderFormError {
    #[error("amount must be a positive integer")]
    InvalidAmount,
    #[error("a PNG receipt must be attached")]
    MissingAttachment,
}

impl OrderFormError {
    #[must_use]
    pub fn alert(self) -> Alert {
        match self {
            Self::InvalidAmount | Self::MissingAttachment => Alert::new(ORDER_FAILED, CHECK_ORDER),
        }
    }
}

/// Parse the amount field. Only a plain positive integer is accepted.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match trimmed.parse::<u32>() {
        Ok(amount) if amount > 0 => Some(amount),
        _ => None,
    }
}

/// Total in reais for `amount` boxes.
#[must_use]
pub fn quote(unit_price: u64, amount: u32) -> u64 {
    unit_price.saturating_mul(u64::from(amount))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderForm {
    pub amount: String,
    pub attachment: Option<Attachment>,
}

impl Default for NewOrderForm {
    fn default() -> Self {
        Self { amount: DEFAULT_AMOUNT.to_owned(), attachment: None }
    }
}

impl NewOrderForm {
    /// Whether the submit action should be offered at all.
    #[must_use]
    pub fn submit_enabled(&self) -> bool {
        parse_amount(&self.amount).is_some() && self.attachment.is_some()
    }

    /// `"Valor: R$ 75"`, or `None` while the amount does not parse.
    #[must_use]
    pub fn price_line(&self, unit_price: u64) -> Option<String> {
        parse_amount(&self.amount).map(|amount| format!("Valor: R$ {}", quote(unit_price, amount)))
    }

    /// # Errors
    ///
    /// Returns [`OrderFormError::InvalidAmount`] before checking the attachment.
    pub fn validate(&self) -> Result<CreateOrderRequest, OrderFormError> {
        let amount = parse_amount(&self.amount).ok_or(OrderFormError::InvalidAmount)?;
        let attachment = self.attachment.as_ref().ok_or(OrderFormError::MissingAttachment)?;
        Ok(CreateOrderRequest::png(amount, attachment.to_base64()))
    }
}
