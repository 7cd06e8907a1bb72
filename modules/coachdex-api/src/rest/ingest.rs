use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::warn;

use coachdex_ingest::IngestError;

use crate::auth::AdminSession;
use crate::AppState;

#[derive(Deserialize)]
pub struct IngestBody {
    pub username: String,
}

#[derive(Deserialize)]
pub struct BatchQuery {
    pub usernames: Option<String>,
}

/// POST /api/profiles — fetch and persist one profile. 404 covers both an
/// unknown handle and an account the locale gate rejected.
pub async fn api_ingest_profile(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Json(body): Json<IngestBody>,
) -> impl IntoResponse {
    let username = body.username.trim();
    if username.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Username is required" })),
        )
            .into_response();
    }

    match state.ingestor.ingest_profile(username).await {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Profile not found or not a German account" })),
        )
            .into_response(),
        Err(e) => ingest_error_response(username, e),
    }
}

/// GET /api/profiles?usernames=a,b,c — sequential batch fetch. Failed or
/// rejected usernames are simply absent from the result.
pub async fn api_ingest_profiles(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Query(params): Query<BatchQuery>,
) -> impl IntoResponse {
    let usernames: Vec<String> = params
        .usernames
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();

    if usernames.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "usernames query parameter is required" })),
        )
            .into_response();
    }

    let profiles = state.ingestor.ingest_profiles(&usernames).await;
    Json(serde_json::json!({
        "count": profiles.len(),
        "profiles": profiles,
    }))
    .into_response()
}

fn ingest_error_response(username: &str, err: IngestError) -> axum::response::Response {
    match err {
        IngestError::RateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
            .into_response(),
        IngestError::Upstream { .. } => {
            warn!(username, error = %err, "Upstream fetch failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": err.to_string() })),
            )
                .into_response()
        }
        IngestError::Config(_) | IngestError::Database(_) => {
            warn!(username, error = %err, "Ingestion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}
