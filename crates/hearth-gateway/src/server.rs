// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use hearth_agent::Services;
use hearth_config::model::GatewayConfig;
use hearth_core::HearthError;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Process start time for the health endpoint.
#[derive(Clone)]
pub struct HealthState {
    pub start_time: Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub services: Arc<Services>,
    pub auth: AuthConfig,
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(services: Arc<Services>, config: &GatewayConfig) -> Self {
        Self {
            services,
            auth: AuthConfig {
                bearer_token: config.bearer_token.clone(),
            },
            health: HealthState {
                start_time: Instant::now(),
            },
        }
    }
}

/// Builds the full route table.
///
/// Session and report routes are public; the email-queue routes sit behind
/// the bearer-token middleware.
pub fn router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/sessions", post(handlers::create_session))
        .route("/v1/sessions/{id}", get(handlers::get_session))
        .route("/v1/sessions/{id}/language", put(handlers::put_language))
        .route("/v1/sessions/{id}/messages", post(handlers::post_message))
        .route(
            "/v1/sessions/{id}/report",
            post(handlers::post_report).get(handlers::get_report),
        )
        .route("/v1/sessions/{id}/report.pdf", get(handlers::get_report_pdf))
        .with_state(state.clone());

    let operator_routes = Router::new()
        .route("/v1/email-queue", get(handlers::list_queue))
        .route("/v1/email-queue/process", post(handlers::process_queue))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(operator_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Serves the gateway until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn start_server(
    config: &GatewayConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), HearthError> {
    if state.auth.bearer_token.is_none() {
        tracing::warn!("gateway.bearer_token is not set; operator routes will reject every request");
    }
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HearthError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| HearthError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}
