use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::AppState;

/// Request body for replacing the shared general template
#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    #[serde(rename = "general-template")]
    pub general_template: Option<String>,
}

/// Replace the shared general template
///
/// PUT /update-general-template
pub async fn update_general_template(
    State(state): State<AppState>,
    Json(req): Json<UpdateTemplateRequest>,
) -> Result<Json<Value>, ApiError> {
    let template = req
        .general_template
        .ok_or_else(|| ApiError::bad_request("New general-template value is missing"))?;

    state.templates.set_general_template(&template).await?;

    Ok(Json(json!({ "message": "General template updated successfully" })))
}
