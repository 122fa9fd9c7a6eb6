//! Order Notifications
//!
//! Status updates hand an [`OrderEvent`] to the [`NotificationDispatcher`],
//! which delivers it in the background. Delivery failures are logged and
//! never reach the request that caused them.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use bazaar::orders::{NotificationKind, OrderStatus, PaymentStatus, StatusChange, TrackingInfo};
use mockall::automock;
use serde::Serialize;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{Instrument, warn};

use crate::domain::orders::records::OrderRecord;

mod logging;
mod webhook;

pub use logging::LoggingNotifier;
pub use webhook::WebhookNotifier;

/// Errors raised while delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("failed to build notification client")]
    Client(#[source] reqwest::Error),

    #[error("notification request failed")]
    Request(#[from] reqwest::Error),

    #[error("notification endpoint responded with status {0}")]
    UnexpectedStatus(u16),
}

/// Everything a notifier needs to tell the customer about an order change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    pub order_uuid: String,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_info: Option<TrackingInfo>,
    pub notifications: SmallVec<[NotificationKind; 4]>,
    pub change: StatusChange,
}

impl OrderEvent {
    /// Event for `order` after `change` was applied.
    #[must_use]
    pub fn new(order: &OrderRecord, change: StatusChange) -> Self {
        Self {
            order_uuid: order.uuid.to_string(),
            order_number: order.order_number.to_string(),
            customer_name: order.customer.name.clone(),
            customer_email: order.customer.email.clone(),
            status: order.lifecycle.status,
            payment_status: order.lifecycle.payment_status,
            tracking_info: order.lifecycle.tracking.clone(),
            notifications: change.notification_kinds(),
            change,
        }
    }
}

#[automock]
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Deliver `event`.
    async fn notify(&self, event: &OrderEvent) -> Result<(), NotificationError>;
}

/// Fire-and-forget delivery of [`OrderEvent`]s.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn OrderNotifier>,
}

impl fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationDispatcher").finish_non_exhaustive()
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(LoggingNotifier))
    }
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new(notifier: Arc<dyn OrderNotifier>) -> Self {
        Self { notifier }
    }

    /// Deliver `event` on a background task.
    ///
    /// Events that warrant no customer message are dropped.
    pub fn dispatch(&self, event: OrderEvent) {
        if event.notifications.is_empty() {
            return;
        }

        let notifier = Arc::clone(&self.notifier);

        let span = tracing::info_span!(
            "notifications.dispatch",
            order_number = %event.order_number
        );

        tokio::spawn(
            async move {
                if let Err(error) = notifier.notify(&event).await {
                    warn!(error = %error, "order notification failed");
                }
            }
            .instrument(span),
        );
    }
}
