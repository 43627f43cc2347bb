//! Recent orders list.
//!
//! The list is fetched on focus and on pull-to-refresh. Rows are derived
//! from the last successful fetch; a failed refresh keeps what is shown.

use time::UtcOffset;

use super::GENERIC_ERROR_TITLE;
use crate::api::Backend;
use crate::error::{Alert, ClientError};
use crate::models::{Badge, Order};
use crate::session::SessionGate;
use crate::storage::KeyValueStore;

pub const TITLE: &str = "Pedidos Recentes";

const UNREACHABLE_MESSAGE: &str = "Erro ao tentar listar pedidos. Tente novamente mais tarde.";

/// One rendered line of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub id: String,
    pub title: String,
    pub date_line: String,
    pub badge: Option<Badge>,
}

#[derive(Debug, Clone)]
pub struct OrdersScreen {
    orders: Vec<Order>,
    offset: UtcOffset,
}

impl OrdersScreen {
    #[must_use]
    pub fn new(offset: UtcOffset) -> Self {
        Self { orders: Vec::new(), offset }
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Fetch the caller's orders and replace the list.
    ///
    /// Returns an alert only when the backend could not be reached. A non-2xx
    /// answer is logged and the current list is kept without telling the user.
    pub async fn refresh<S, B>(&mut self, session: &SessionGate<S>, backend: &B) -> Option<Alert>
    where
        S: KeyValueStore,
        B: Backend + ?Sized,
    {
        let Some(token) = session.token() else {
            tracing::warn!("order list requested without a session");
            return Some(Alert::new(GENERIC_ERROR_TITLE, UNREACHABLE_MESSAGE));
        };
        match backend.list_my_orders(token).await {
            Ok(orders) => {
                tracing::debug!(count = orders.len(), "orders refreshed");
                self.orders = orders;
                None
            }
            Err(ClientError::Rejected { status, .. }) => {
                tracing::warn!(status, "order list rejected; keeping current list");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "order list failed");
                Some(Alert::new(GENERIC_ERROR_TITLE, UNREACHABLE_MESSAGE))
            }
        }
    }

    /// Rows in backend order.
    #[must_use]
    pub fn rows(&self) -> Vec<OrderRow> {
        self.orders
            .iter()
            .map(|order| OrderRow {
                id: order.id.clone(),
                title: order.title(),
                date_line: order.date_line(self.offset),
                badge: order.badge(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "orders_test.rs"]
mod orders_test;
