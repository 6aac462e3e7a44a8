//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::error;

use crate::db;
use crate::errors::IndexerError;
use crate::events::EventRecord;
use crate::summary::CampaignSummary;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/contributors/:address/events", get(get_contributor_events))
        .route("/summary", get(get_summary))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub address: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for IndexerError {
    fn into_response(self) -> Response {
        error!("API request failed: {self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /contributors/:address/events`
///
/// Returns every indexed event triggered by `address` (contributions and
/// refunds for a contributor; creation, pauses and withdrawal for the owner).
pub async fn get_contributor_events(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Result<Json<EventsResponse>, IndexerError> {
    let events = db::get_events_for_actor(&state.pool, &address).await?;
    Ok(Json(EventsResponse {
        address,
        count: events.len(),
        events,
    }))
}

/// `GET /events`
pub async fn get_all_events(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<AllEventsResponse>, IndexerError> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(AllEventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /summary`
///
/// Replays all indexed events into the observer's view of the ledger.
pub async fn get_summary(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<CampaignSummary>, IndexerError> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(CampaignSummary::replay(&events)?))
}
