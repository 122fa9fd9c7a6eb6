//! Logging Notifier

use async_trait::async_trait;
use tracing::info;

use crate::notifications::{NotificationError, OrderEvent, OrderNotifier};

/// Writes each event to the log instead of contacting the customer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl OrderNotifier for LoggingNotifier {
    async fn notify(&self, event: &OrderEvent) -> Result<(), NotificationError> {
        for kind in &event.notifications {
            info!(
                order_number = %event.order_number,
                customer_email = %event.customer_email,
                status = %event.status,
                payment_status = %event.payment_status,
                notification = kind.as_str(),
                "order notification"
            );
        }

        Ok(())
    }
}
