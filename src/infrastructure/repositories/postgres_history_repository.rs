use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};

use super::store_err;
use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::repositories::{HistoryEntry, HistoryRepository};

/// PostgreSQL implementation of HistoryRepository
///
/// A `histories` row marks ownership; the entries live in a normalized
/// side table keyed by (email, entry_index).
pub struct PostgresHistoryRepository {
    pool: PgPool,
}

impl PostgresHistoryRepository {
    /// Creates a new PostgresHistoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for PostgresHistoryRepository {
    async fn init(&self, email: &str) -> PlannerResult<()> {
        sqlx::query("INSERT INTO histories (email) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(())
    }

    async fn append(&self, email: &str, data: Value) -> PlannerResult<i32> {
        self.init(email).await?;

        let row = sqlx::query(
            r#"
            INSERT INTO history_entries (email, entry_index, data)
            SELECT $1, COALESCE(MAX(entry_index), 0) + 1, $2
            FROM history_entries
            WHERE email = $1
            RETURNING entry_index
            "#,
        )
        .bind(email)
        .bind(data)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        row.try_get("entry_index").map_err(store_err)
    }

    async fn remove(&self, email: &str, index: i32) -> PlannerResult<()> {
        let result =
            sqlx::query("DELETE FROM history_entries WHERE email = $1 AND entry_index = $2")
                .bind(email)
                .bind(index)
                .execute(&self.pool)
                .await
                .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(PlannerError::NotFound("history entry".to_string()));
        }
        Ok(())
    }

    async fn entries(&self, email: &str) -> PlannerResult<Vec<HistoryEntry>> {
        let owner = sqlx::query("SELECT 1 AS one FROM histories WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;

        if owner.is_none() {
            return Err(PlannerError::NotFound("history".to_string()));
        }

        let rows = sqlx::query(
            r#"
            SELECT entry_index, data
            FROM history_entries
            WHERE email = $1
            ORDER BY entry_index
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.into_iter()
            .map(|row| {
                Ok(HistoryEntry {
                    index: row.try_get("entry_index").map_err(store_err)?,
                    data: row.try_get("data").map_err(store_err)?,
                })
            })
            .collect()
    }
}
