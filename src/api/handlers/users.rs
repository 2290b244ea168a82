use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::auth::password::{hash_password, verify_password};
use crate::domain::repositories::{User, UserUpdate};
use crate::domain::user::value_objects::Email;

/// Request body for account creation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub terms: bool,
}

/// Request body for credential validation
#[derive(Debug, Deserialize)]
pub struct CheckCredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Request body for partial account updates
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub terms: Option<bool>,
}

/// User data returned to clients; never includes the password hash
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub terms: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            full_name: user.full_name,
            terms: user.terms,
            created_at: user.created_at,
        }
    }
}

/// Create a new account and provision its plan slot and history document
///
/// POST /add-user
pub async fn add_user(
    State(state): State<AppState>,
    Json(req): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let email = Email::new(&req.email)
        .map_err(|e| ApiError::bad_request(format!("Invalid email: {}", e)))?;

    if req.password.len() < 8 {
        return Err(ApiError::bad_request(
            "Password must be at least 8 characters",
        ));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("Email already exists"));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to hash password: {}", e)))?;

    let user = User {
        id: Uuid::new_v4(),
        email: email.clone(),
        password_hash,
        full_name: req.full_name,
        terms: req.terms,
        created_at: Utc::now(),
    };
    state.users.create(user).await?;

    // account existence gates the job slot: provision both side documents now
    state.plans.clear(email.as_str()).await?;
    state.history.init(email.as_str()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User added successfully" })),
    ))
}

/// Validate an email/password pair
///
/// POST /check-credentials
pub async fn check_credentials(
    State(state): State<AppState>,
    Json(req): Json<CheckCredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = Email::new(&req.email)
        .map_err(|e| ApiError::bad_request(format!("Invalid email: {}", e)))?;

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
        ApiError::internal_server_error(format!("Password verification failed: {}", e))
    })?;

    if !valid {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    Ok(Json(json!({ "message": "Credentials are valid" })))
}

/// Apply a partial update to an account
///
/// PUT /update-user/:email
pub async fn update_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = Email::new(&email)
        .map_err(|e| ApiError::bad_request(format!("Invalid email: {}", e)))?;

    let password_hash = match req.password {
        Some(password) => Some(hash_password(&password).map_err(|e| {
            ApiError::internal_server_error(format!("Failed to hash password: {}", e))
        })?),
        None => None,
    };

    let update = UserUpdate {
        full_name: req.full_name,
        password_hash,
        terms: req.terms,
    };
    state.users.update(&email, update).await?;

    Ok(Json(json!({ "message": "User updated successfully" })))
}

/// Fetch an account by email
///
/// GET /get-user/:email
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let email = Email::new(&email)
        .map_err(|e| ApiError::bad_request(format!("Invalid email: {}", e)))?;

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
