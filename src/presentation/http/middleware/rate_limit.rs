// src/presentation/http/middleware/rate_limit.rs
use ::governor::middleware::NoOpMiddleware;
use axum::body::Body;
use std::sync::{Arc, OnceLock};
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::SmartIpKeyExtractor,
};

/// Per-IP limiter for the credential endpoints (login submit and token).
/// The client address comes from forwarding headers or the peer address,
/// so the server must be started with connect info.
pub type CredentialRateLimit = GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>;

// one request slot is replenished every REPLENISH_SECONDS
const REPLENISH_SECONDS: u64 = 2;
const BURST_SIZE: u32 = 10;

pub fn rate_limit_layer() -> Option<CredentialRateLimit> {
    static CONFIG: OnceLock<Option<Arc<GovernorConfig<SmartIpKeyExtractor, NoOpMiddleware>>>> =
        OnceLock::new();

    let config = CONFIG.get_or_init(|| {
        let mut builder = GovernorConfigBuilder::default();
        builder.per_second(REPLENISH_SECONDS);
        builder.burst_size(BURST_SIZE);
        builder
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .map(Arc::new)
    });

    match config {
        Some(config) => Some(GovernorLayer::new(Arc::clone(config))),
        None => {
            tracing::warn!("rate limiter configuration rejected; continuing without it");
            None
        }
    }
}
