//! App Context

use std::{sync::Arc, time::Duration};

use bazaar::orders::{StatusMachine, TransitionPolicy};
use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        coupons::{CouponsService, PgCouponsService},
        orders::{OrdersService, PgOrdersService},
    },
    notifications::{NotificationDispatcher, NotificationError, WebhookNotifier},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] MigrateError),

    #[error("failed to configure order notifications")]
    Notifier(#[source] NotificationError),
}

/// Engine behaviour chosen at startup.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    /// How order status moves outside the regular lifecycle are handled.
    pub policy: TransitionPolicy,

    /// Endpoint order events are posted to. Events are only logged when unset.
    pub webhook_url: Option<String>,

    /// Per-request timeout for webhook delivery.
    pub webhook_timeout: Duration,

    /// Apply pending migrations before serving.
    pub run_migrations: bool,
}

#[derive(Clone)]
pub struct AppContext {
    pub coupons: Arc<dyn CouponsService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection, migrating
    /// the schema or building the webhook client fails.
    pub async fn from_database_url(
        url: &str,
        settings: EngineSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if settings.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        let notifications = match settings.webhook_url {
            Some(webhook_url) => NotificationDispatcher::new(Arc::new(
                WebhookNotifier::new(webhook_url, settings.webhook_timeout)
                    .map_err(AppInitError::Notifier)?,
            )),
            None => NotificationDispatcher::default(),
        };

        let db = Db::new(pool);

        Ok(Self {
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(
                db,
                StatusMachine::new(settings.policy),
                notifications,
            )),
        })
    }
}
