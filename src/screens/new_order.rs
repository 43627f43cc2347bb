//! New order screen: amount, price quote, pix key, and receipt upload.

use std::path::Path;

use super::{Outcome, unreachable_alert};
use crate::api::Backend;
use crate::attachment::{Attachment, AttachmentError};
use crate::config::ClientConfig;
use crate::error::{Alert, ClientError};
use crate::forms::NewOrderForm;
use crate::session::SessionGate;
use crate::storage::KeyValueStore;

pub const TITLE: &str = "Novo Pedido";

const ATTACHMENT_REJECTED_TITLE: &str = "Erro ao selecionar anexo";
const REJECTED_TITLE: &str = "Falha no pedido";
const REJECTED_FALLBACK: &str = "Verifique os dados do pedido";
const UNREACHABLE_MESSAGE: &str = "Falha ao tentar realizar o pedido. Tente novamente mais tarde.";

#[derive(Debug, Clone)]
pub struct NewOrderScreen {
    pub form: NewOrderForm,
    unit_price: u64,
    pix_key: Option<String>,
}

impl NewOrderScreen {
    #[must_use]
    pub fn new(unit_price: u64, pix_key: Option<String>) -> Self {
        Self { form: NewOrderForm::default(), unit_price, pix_key }
    }

    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.unit_price, config.pix_key.clone())
    }

    /// Key to pay to before attaching the receipt, when the shop has one.
    #[must_use]
    pub fn pix_key(&self) -> Option<&str> {
        self.pix_key.as_deref()
    }

    #[must_use]
    pub fn price_line(&self) -> Option<String> {
        self.form.price_line(self.unit_price)
    }

    #[must_use]
    pub fn has_attachment(&self) -> bool {
        self.form.attachment.is_some()
    }

    /// Attach the receipt at `path`. A rejected file leaves any previous
    /// attachment in place.
    ///
    /// # Errors
    ///
    /// Returns the alert to show when the file is unreadable or not a PNG.
    pub fn select_attachment(&mut self, path: &Path) -> Result<(), Alert> {
        self.accept(Attachment::load(path))
    }

    /// Attach an in-memory image, e.g. one handed over by a picker.
    ///
    /// # Errors
    ///
    /// Returns the alert to show when the bytes are not a PNG.
    pub fn select_attachment_bytes(&mut self, bytes: Vec<u8>) -> Result<(), Alert> {
        self.accept(Attachment::from_png_bytes(bytes))
    }

    fn accept(&mut self, selected: Result<Attachment, AttachmentError>) -> Result<(), Alert> {
        match selected {
            Ok(attachment) => {
                tracing::debug!(bytes = attachment.len(), "receipt attached");
                self.form.attachment = Some(attachment);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "receipt rejected");
                Err(Alert::titled(ATTACHMENT_REJECTED_TITLE))
            }
        }
    }

    /// Place the order. Blocked client-side unless the amount is a positive
    /// integer and a receipt is attached.
    pub async fn submit<S, B>(&self, session: &SessionGate<S>, backend: &B) -> Outcome
    where
        S: KeyValueStore,
        B: Backend + ?Sized,
    {
        let request = match self.form.validate() {
            Ok(request) => request,
            Err(e) => return Outcome::Alert(e.alert()),
        };
        let Some(token) = session.token() else {
            return Outcome::Alert(unreachable_alert(&ClientError::Unauthenticated, UNREACHABLE_MESSAGE));
        };
        match backend.create_order(token, &request).await {
            Ok(()) => {
                tracing::info!(amount = request.amount, "order placed");
                Outcome::OrderPlaced
            }
            Err(ClientError::Rejected { body, .. }) => Outcome::Alert(rejection_alert(&body)),
            Err(e) => Outcome::Alert(unreachable_alert(&e, UNREACHABLE_MESSAGE)),
        }
    }
}

/// The backend explains order rejections in its response text.
fn rejection_alert(body: &str) -> Alert {
    let message = body.trim();
    if message.is_empty() {
        Alert::new(REJECTED_TITLE, REJECTED_FALLBACK)
    } else {
        Alert::new(REJECTED_TITLE, message)
    }
}

#[cfg(test)]
#[path = "new_order_test.rs"]
mod new_order_test;
