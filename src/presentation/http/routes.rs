// src/presentation/http/routes.rs
use crate::presentation::http::controllers::{oauth, users};
use crate::presentation::http::middleware::rate_limit::rate_limit_layer;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json, Router,
    http::Method,
    routing::{MethodRouter, get, post},
};
use serde::Serialize;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

pub fn build_router(state: HttpState) -> Router {
    build_router_with_rate_limiter(state, true)
}

/// The limiter keys on the client IP, so it is only usable when the server
/// provides connect info. In-process tests build without it.
pub fn build_router_with_rate_limiter(state: HttpState, rate_limit: bool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health))
        .route(
            "/auth/authorize",
            get(oauth::authorize_form).merge(limited(post(oauth::authorize), rate_limit)),
        )
        .route("/auth/token", limited(post(oauth::token), rate_limit))
        .route("/users/me", get(users::me))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

fn limited(route: MethodRouter, enabled: bool) -> MethodRouter {
    if !enabled {
        return route;
    }
    match rate_limit_layer() {
        Some(layer) => route.layer(layer),
        None => route,
    }
}

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".into(),
    })
}
