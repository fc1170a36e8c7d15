//! Brief run API handlers.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use briefing_core::{DocumentTab, RunSnapshot, WorkflowError};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for starting a run
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBriefBody {
    #[serde(default)]
    pub company_name: String,
    /// Optional; sent to the service as an empty string when absent
    #[serde(default)]
    pub interviewee_email: Option<String>,
}

/// Response for a started run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBriefResponse {
    pub run_id: Uuid,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct BriefErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(BriefErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// Start a new run, replacing any run in progress
pub async fn start_brief(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StartBriefBody>,
) -> Response {
    let email = body.interviewee_email.as_deref().unwrap_or_default();

    match state.workflow().start(&body.company_name, email).await {
        Ok(run_id) => {
            info!("Accepted brief request for '{}' as run {}", body.company_name.trim(), run_id);
            (StatusCode::ACCEPTED, Json(StartBriefResponse { run_id })).into_response()
        }
        Err(e @ WorkflowError::EmptyCompanyName) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Get the current run snapshot
pub async fn current_brief(State(state): State<Arc<AppState>>) -> Json<RunSnapshot> {
    Json(state.workflow().current())
}

/// Get one document of the current run as plain text
pub async fn current_document(
    State(state): State<Arc<AppState>>,
    Path(tab): Path<String>,
) -> Response {
    let tab: DocumentTab = match tab.parse() {
        Ok(tab) => tab,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    let snapshot = state.workflow().current();
    match snapshot.state.bundle() {
        Some(bundle) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            bundle.document(tab).to_string(),
        )
            .into_response(),
        None => error_response(
            StatusCode::CONFLICT,
            format!(
                "No documents available: current run is {}",
                snapshot.state.name()
            ),
        ),
    }
}
