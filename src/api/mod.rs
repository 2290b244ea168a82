// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::repositories::{
    HistoryRepository, PlanRepository, TemplateRepository, UserRepository,
};
use crate::planner::PlanCoordinator;

/// Shared handler state: repository ports plus the job coordinator
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub templates: Arc<dyn TemplateRepository>,
    pub plans: Arc<dyn PlanRepository>,
    pub history: Arc<dyn HistoryRepository>,
    pub coordinator: Arc<PlanCoordinator>,
}

/// Builds the application router
///
/// Shared by the binary and the integration tests so both exercise the same
/// routes, CORS policy, and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::users::health_check))
        // Plan generation pipeline
        .route("/generate-response", post(handlers::plans::generate_response))
        .route("/improve-response", post(handlers::plans::improve_response))
        .route(
            "/get-improved-response/:requester_key",
            get(handlers::plans::get_improved_response),
        )
        // Account routes
        .route("/check-credentials", post(handlers::users::check_credentials))
        .route("/add-user", post(handlers::users::add_user))
        .route("/update-user/:email", put(handlers::users::update_user))
        .route("/get-user/:email", get(handlers::users::get_user))
        // Template administration
        .route(
            "/update-general-template",
            put(handlers::templates::update_general_template),
        )
        // Plan history
        .route(
            "/update-user-history/:email",
            put(handlers::history::update_user_history),
        )
        .route(
            "/remove-from-history/:email/:index",
            delete(handlers::history::remove_from_history),
        )
        .route(
            "/get-user-history/:email",
            get(handlers::history::get_user_history),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
