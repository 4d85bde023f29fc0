// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use hearth_agent::{AdapterHealth, DeliveryReport, NewSession, SessionView};
use hearth_core::{EmailQueueEntry, Language, Plan, QueueStatus};
use hearth_email::{ProcessSummary, REPORT_FILENAME};
use hearth_report::Variant;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::GatewayState;
use crate::sse;

/// Request body for `POST /v1/sessions/{id}/messages`.
///
/// Omitting `content` asks for the opening turn, or retries the last failed one.
#[derive(Debug, Default, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// Request body for `PUT /v1/sessions/{id}/language`.
#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: Language,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub variant: Variant,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueueQuery {
    pub status: Option<QueueStatus>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub adapters: Vec<AdapterHealth>,
}

/// Response body for `POST /v1/sessions/{id}/report`.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub session_id: String,
    /// Whether this request synthesized the plan.
    pub created: bool,
    pub plan: Plan,
    /// Present only when this request created the plan and sent it out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryReport>,
}

#[derive(Debug, Serialize)]
pub struct QueueListResponse {
    pub entries: Vec<EmailQueueEntry>,
}

/// GET /health
///
/// Unauthenticated. Answers 503 when any adapter reports unhealthy.
pub async fn get_health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let adapters = state.services.health().await;
    let healthy = adapters.iter().all(AdapterHealth::is_healthy);
    let (code, status) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: state.health.start_time.elapsed().as_secs(),
            adapters,
        }),
    )
}

/// POST /v1/sessions
pub async fn create_session(
    State(state): State<GatewayState>,
    Json(body): Json<NewSession>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let conversation = &state.services.conversation;
    let session = conversation.create_session(body).await?;
    let view = conversation.view(&session.id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /v1/sessions/{id}
pub async fn get_session(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(state.services.conversation.view(&id).await?))
}

/// PUT /v1/sessions/{id}/language
pub async fn put_language(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<LanguageRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let conversation = &state.services.conversation;
    conversation.set_language(&id, body.language).await?;
    Ok(Json(conversation.view(&id).await?))
}

/// POST /v1/sessions/{id}/messages
///
/// Runs the turn, then streams the stored reply as SSE.
pub async fn post_message(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<MessageRequest>,
) -> Result<Response, ApiError> {
    let reply = state
        .services
        .conversation
        .handle_turn(&id, body.content.as_deref())
        .await?;
    Ok(sse::reply_stream(&id, &reply, state.services.stream_delay).into_response())
}

/// POST /v1/sessions/{id}/report
///
/// 201 when this request generated the plan, 200 when it already existed,
/// 409 while another request is generating it.
pub async fn post_report(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
    let (generated, delivery) = state.services.reports.generate_and_deliver(&id).await?;
    let created = generated.is_new();
    let code = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        code,
        Json(ReportResponse {
            session_id: id,
            created,
            plan: generated.into_plan(),
            delivery,
        }),
    ))
}

/// GET /v1/sessions/{id}/report?variant=interactive|print
pub async fn get_report(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Html<String>, ApiError> {
    Ok(Html(
        state.services.reports.render_html(&id, query.variant).await?,
    ))
}

/// GET /v1/sessions/{id}/report.pdf
pub async fn get_report_pdf(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.services.reports.render_pdf(&id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// POST /v1/email-queue/process
pub async fn process_queue(
    State(state): State<GatewayState>,
) -> Result<Json<ProcessSummary>, ApiError> {
    Ok(Json(state.services.queue.run_once(Utc::now()).await?))
}

/// GET /v1/email-queue?status=pending|processing|sent|failed
pub async fn list_queue(
    State(state): State<GatewayState>,
    Query(query): Query<QueueQuery>,
) -> Result<Json<QueueListResponse>, ApiError> {
    let entries = state.services.storage().list_emails(query.status).await?;
    Ok(Json(QueueListResponse { entries }))
}
