use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::repositories::HistoryEntry;

/// Append an item to a user's plan history
///
/// PUT /update-user-history/:email
pub async fn update_user_history(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(data): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let index = state.history.append(&email, data).await?;

    Ok(Json(json!({
        "message": "User history created successfully",
        "index": index
    })))
}

/// Remove one history item by its index
///
/// DELETE /remove-from-history/:email/:index
pub async fn remove_from_history(
    State(state): State<AppState>,
    Path((email, index)): Path<(String, i32)>,
) -> Result<Json<Value>, ApiError> {
    state.history.remove(&email, index).await?;

    Ok(Json(json!({
        "message": format!("Item at index {} removed from user history successfully", index)
    })))
}

/// Fetch a user's full plan history
///
/// GET /get-user-history/:email
pub async fn get_user_history(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let entries = state.history.entries(&email).await?;
    Ok(Json(entries))
}
