//! Screen controllers.
//!
//! SYSTEM CONTEXT
//! ==============
//! One controller per screen of the shop app. A controller holds its form and
//! resolves each user action to an [`Outcome`]. Failures never change the
//! session or the form, so the user lands back on the same screen with
//! everything they typed.
//!
//! The "loading" flags of a touch UI have no counterpart here: every action on
//! [`App`](crate::app::App) borrows it mutably across the request, so a second
//! submit cannot start while one is in flight.

pub mod login;
pub mod new_order;
pub mod orders;
pub mod signup;
pub mod user;

pub use login::LoginScreen;
pub use new_order::NewOrderScreen;
pub use orders::{OrderRow, OrdersScreen};
pub use signup::SignupScreen;
pub use user::UserScreen;

use crate::error::{Alert, ClientError};

/// Title of the alert shown when a request never reached the backend.
pub(crate) const GENERIC_ERROR_TITLE: &str = "Erro";

/// What the UI should do after a screen action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Stay on the screen and show this alert.
    Alert(Alert),
    /// A session was established; the app switches to the order tabs.
    LoggedIn,
    /// The session was dropped; the app switches to the login screen.
    LoggedOut,
    /// The order was accepted; the order screen closes.
    OrderPlaced,
}

/// Alert for a request that failed without a usable backend answer.
pub(crate) fn unreachable_alert(error: &ClientError, message: &str) -> Alert {
    tracing::warn!(error = %error, "request failed");
    Alert::new(GENERIC_ERROR_TITLE, message)
}
