use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::store_err;
use crate::domain::errors::PlannerResult;
use crate::domain::preferences::VacationType;
use crate::domain::repositories::FeedbackRepository;

/// PostgreSQL implementation of FeedbackRepository
pub struct PostgresFeedbackRepository {
    pool: PgPool,
}

impl PostgresFeedbackRepository {
    /// Creates a new PostgresFeedbackRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepository for PostgresFeedbackRepository {
    async fn push_note(&self, vacation_type: VacationType, note: &str) -> PlannerResult<()> {
        sqlx::query("INSERT INTO feedback_notes (vacation_type, note) VALUES ($1, $2)")
            .bind(vacation_type.as_str())
            .bind(note)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(())
    }

    async fn notes(&self, vacation_type: VacationType) -> PlannerResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT note FROM feedback_notes WHERE vacation_type = $1 ORDER BY id",
        )
        .bind(vacation_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.into_iter()
            .map(|row| row.try_get("note").map_err(store_err))
            .collect()
    }

    async fn clear(&self, vacation_type: VacationType) -> PlannerResult<()> {
        sqlx::query("DELETE FROM feedback_notes WHERE vacation_type = $1")
            .bind(vacation_type.as_str())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(())
    }
}
