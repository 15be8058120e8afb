// src/infrastructure/sweeper.rs
use crate::application::commands::authorization::AuthorizationCodeService;
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::MissedTickBehavior};

/// Periodically drops expired authorization codes that were never exchanged.
/// Consumption already rejects expired codes; this only reclaims storage.
pub fn spawn_code_sweeper(
    codes: Arc<AuthorizationCodeService>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            if let Err(err) = codes.purge_expired().await {
                tracing::warn!(error = %err, "expired authorization code sweep failed");
            }
        }
    })
}
