use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::plan::{annotate_saveable, PlanStatus};
use crate::domain::preferences::TripPreferences;

/// Query parameters identifying the requester of a generation job
#[derive(Debug, Deserialize)]
pub struct RequesterQuery {
    #[serde(rename = "requesterKey")]
    pub requester_key: String,
}

/// Response for an accepted generation job
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub message: String,
}

impl AcceptedResponse {
    fn scheduled() -> Self {
        Self {
            message: "Response generation initiated. Please check back later.".to_string(),
        }
    }
}

/// Submit a generation job
///
/// POST /generate-response?requesterKey=<key>
///
/// The response never contains the plan; clients poll for it separately.
pub async fn generate_response(
    State(state): State<AppState>,
    Query(query): Query<RequesterQuery>,
    Json(prefs): Json<TripPreferences>,
) -> Result<(StatusCode, Json<AcceptedResponse>), ApiError> {
    prefs.validate().map_err(ApiError::bad_request)?;

    state.coordinator.submit(&query.requester_key, &prefs).await?;

    Ok((StatusCode::ACCEPTED, Json(AcceptedResponse::scheduled())))
}

/// Request body for re-submitting an existing plan
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveRequest {
    pub plan: Value,
    #[serde(default)]
    pub general_template: Option<String>,
}

/// Re-submit an existing plan for improvement
///
/// POST /improve-response?requesterKey=<key>
pub async fn improve_response(
    State(state): State<AppState>,
    Query(query): Query<RequesterQuery>,
    Json(req): Json<ImproveRequest>,
) -> Result<(StatusCode, Json<AcceptedResponse>), ApiError> {
    state
        .coordinator
        .submit_improvement(&query.requester_key, &req.plan, req.general_template.as_deref())
        .await?;

    Ok((StatusCode::ACCEPTED, Json(AcceptedResponse::scheduled())))
}

/// Poll for a finished plan
///
/// GET /get-improved-response/:requester_key
///
/// Not-ready is reported as 503 so clients can tell "still working" from a
/// real failure; a recorded background failure is reported as 502 with the
/// stored reason.
pub async fn get_improved_response(
    State(state): State<AppState>,
    Path(requester_key): Path<String>,
) -> Result<Response, ApiError> {
    let status = state.plans.status(&requester_key).await?;

    let response = match status {
        PlanStatus::Ready(plan) => {
            (StatusCode::OK, Json(annotate_saveable(plan, &requester_key))).into_response()
        }
        PlanStatus::Empty => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "message": "No improved response available yet. Please try again later."
            })),
        )
            .into_response(),
        PlanStatus::Failed { reason } => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "message": "Plan generation failed. Please submit a new request.",
                "reason": reason
            })),
        )
            .into_response(),
    };

    Ok(response)
}
