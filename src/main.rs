use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use wayfarer_api::api::{router, AppState};
use wayfarer_api::config::AppConfig;
use wayfarer_api::domain::repositories::{
    FeedbackRepository, HistoryRepository, PlanRepository, TemplateRepository, UserRepository,
};
use wayfarer_api::infrastructure::repositories::{
    PostgresFeedbackRepository, PostgresHistoryRepository, PostgresPlanRepository,
    PostgresTemplateRepository, PostgresUserRepository,
};
use wayfarer_api::llm::{CompletionClient, OpenAiClient};
use wayfarer_api::planner::{CoordinatorConfig, PlanCoordinator};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Database connected successfully");

    // Wire the repository ports to their Postgres adapters
    let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let templates: Arc<dyn TemplateRepository> =
        Arc::new(PostgresTemplateRepository::new(pool.clone()));
    let feedback: Arc<dyn FeedbackRepository> =
        Arc::new(PostgresFeedbackRepository::new(pool.clone()));
    let plans: Arc<dyn PlanRepository> = Arc::new(PostgresPlanRepository::new(pool.clone()));
    let history: Arc<dyn HistoryRepository> = Arc::new(PostgresHistoryRepository::new(pool));

    let client: Arc<dyn CompletionClient> = Arc::new(
        OpenAiClient::from_config(&config.llm).expect("Failed to build completion client"),
    );

    let coordinator = Arc::new(PlanCoordinator::new(
        Arc::clone(&templates),
        feedback,
        Arc::clone(&plans),
        client,
        CoordinatorConfig {
            completion_permits: config.completion_permits,
            ..CoordinatorConfig::default()
        },
    ));

    let state = AppState {
        users,
        templates,
        plans,
        history,
        coordinator,
    };
    let app = router(state);

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
