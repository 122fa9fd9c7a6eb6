//! Order Engine Config

use std::time::Duration;

use bazaar::orders::TransitionPolicy;
use bazaar_app::context::EngineSettings;
use clap::Args;

/// Order lifecycle and notification settings.
#[derive(Debug, Args)]
pub struct EngineConfig {
    /// How status moves outside the regular lifecycle are handled (permissive, strict)
    #[arg(long, env = "ORDER_TRANSITION_POLICY", default_value = "permissive")]
    pub order_transition_policy: TransitionPolicy,

    /// Endpoint order notifications are posted to; notifications are only logged when unset
    #[arg(long, env = "NOTIFICATION_WEBHOOK_URL")]
    pub notification_webhook_url: Option<String>,

    /// Webhook request timeout in seconds.
    #[arg(long, env = "NOTIFICATION_TIMEOUT_SECONDS", default_value_t = 5_u64)]
    pub notification_timeout_seconds: u64,
}

impl EngineConfig {
    /// Settings for building the application context.
    #[must_use]
    pub fn settings(&self, run_migrations: bool) -> EngineSettings {
        EngineSettings {
            policy: self.order_transition_policy,
            webhook_url: self.notification_webhook_url.clone(),
            webhook_timeout: Duration::from_secs(self.notification_timeout_seconds),
            run_migrations,
        }
    }
}
