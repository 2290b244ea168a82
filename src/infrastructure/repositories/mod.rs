// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod postgres_feedback_repository;
pub mod postgres_history_repository;
pub mod postgres_plan_repository;
pub mod postgres_template_repository;
pub mod postgres_user_repository;

pub use postgres_feedback_repository::PostgresFeedbackRepository;
pub use postgres_history_repository::PostgresHistoryRepository;
pub use postgres_plan_repository::PostgresPlanRepository;
pub use postgres_template_repository::PostgresTemplateRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::errors::PlannerError;

/// Maps a database error to the storage-failure variant of the taxonomy
pub(crate) fn store_err(err: sqlx::Error) -> PlannerError {
    PlannerError::Unavailable(err.to_string())
}
