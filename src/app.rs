//! Root of the app: the session gate plus tab routing.
//!
//! DESIGN
//! ======
//! `App` owns the only long-lived state: the session gate, the backend, and
//! the config the screens are built from. Screens are constructed on demand
//! and borrow the gate for the duration of one action.
//!
//! INVARIANTS
//! ==========
//! - Authenticated actions are refused with [`ClientError::Unauthenticated`]
//!   while the gate shows the login view; the backend is never called.
//! - Login, signup, and logout land on the home tab.

use crate::api::Backend;
use crate::config::ClientConfig;
use crate::error::{Alert, ClientError};
use crate::screens::{LoginScreen, NewOrderScreen, OrdersScreen, Outcome, SignupScreen, UserScreen};
use crate::session::{SessionGate, View};
use crate::storage::KeyValueStore;

/// Bottom tabs of the authenticated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    User,
}

impl Tab {
    pub const ALL: [Self; 2] = [Self::Home, Self::User];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Início",
            Self::User => crate::screens::user::TITLE,
        }
    }
}

pub struct App<S, B> {
    session: SessionGate<S>,
    backend: B,
    config: ClientConfig,
    tab: Tab,
}

impl<S, B> App<S, B>
where
    S: KeyValueStore,
    B: Backend,
{
    /// Hydrate the gate from `store`. An unreadable store starts logged out.
    #[must_use]
    pub fn start(store: S, backend: B, config: ClientConfig) -> Self {
        Self { session: SessionGate::restore(store), backend, config, tab: Tab::default() }
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.session.view()
    }

    #[must_use]
    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    #[must_use]
    pub fn session(&self) -> &SessionGate<S> {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Unauthenticated`] while logged out.
    pub fn require_login(&self) -> Result<(), ClientError> {
        match self.view() {
            View::Authenticated => Ok(()),
            View::Login => Err(ClientError::Unauthenticated),
        }
    }

    #[must_use]
    pub fn orders_screen(&self) -> OrdersScreen {
        OrdersScreen::new(self.config.display_offset)
    }

    #[must_use]
    pub fn new_order_screen(&self) -> NewOrderScreen {
        NewOrderScreen::from_config(&self.config)
    }

    pub async fn login(&mut self, screen: &LoginScreen) -> Outcome {
        let outcome = screen.submit(&mut self.session, &self.backend).await;
        self.route(&outcome);
        outcome
    }

    pub async fn signup(&mut self, screen: &SignupScreen) -> Outcome {
        let outcome = screen.submit(&mut self.session, &self.backend).await;
        self.route(&outcome);
        outcome
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Unauthenticated`] while logged out.
    pub async fn refresh_orders(&mut self, screen: &mut OrdersScreen) -> Result<Option<Alert>, ClientError> {
        self.require_login()?;
        Ok(screen.refresh(&self.session, &self.backend).await)
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Unauthenticated`] while logged out.
    pub async fn place_order(&mut self, screen: &NewOrderScreen) -> Result<Outcome, ClientError> {
        self.require_login()?;
        Ok(screen.submit(&self.session, &self.backend).await)
    }

    pub async fn logout(&mut self) -> Outcome {
        let outcome = UserScreen.logout(&mut self.session, &self.backend).await;
        self.route(&outcome);
        outcome
    }

    fn route(&mut self, outcome: &Outcome) {
        if matches!(outcome, Outcome::LoggedIn | Outcome::LoggedOut) {
            self.tab = Tab::Home;
        }
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;
