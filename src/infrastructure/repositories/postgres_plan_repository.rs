use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};

use super::store_err;
use crate::domain::errors::PlannerResult;
use crate::domain::plan::PlanStatus;
use crate::domain::repositories::PlanRepository;

/// PostgreSQL implementation of PlanRepository
///
/// One row per requester key; status transitions are single-row upserts, so
/// the database's row-level atomicity is all the locking this needs.
pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    /// Creates a new PostgresPlanRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert(
        &self,
        requester_key: &str,
        status: &str,
        plan: Option<&Value>,
        failure_reason: Option<&str>,
    ) -> PlannerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO plans (requester_key, status, plan, failure_reason, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (requester_key)
            DO UPDATE SET status = $2, plan = $3, failure_reason = $4, updated_at = NOW()
            "#,
        )
        .bind(requester_key)
        .bind(status)
        .bind(plan)
        .bind(failure_reason)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(())
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn clear(&self, requester_key: &str) -> PlannerResult<()> {
        self.upsert(requester_key, "empty", None, None).await
    }

    async fn mark_ready(&self, requester_key: &str, plan: &Value) -> PlannerResult<()> {
        self.upsert(requester_key, "ready", Some(plan), None).await
    }

    async fn mark_failed(&self, requester_key: &str, reason: &str) -> PlannerResult<()> {
        self.upsert(requester_key, "failed", None, Some(reason)).await
    }

    async fn status(&self, requester_key: &str) -> PlannerResult<PlanStatus> {
        let row = sqlx::query(
            "SELECT status, plan, failure_reason FROM plans WHERE requester_key = $1",
        )
        .bind(requester_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        let Some(row) = row else {
            // unknown keys read as not-ready, never as an error
            return Ok(PlanStatus::Empty);
        };

        let status: String = row.try_get("status").map_err(store_err)?;
        match status.as_str() {
            "ready" => {
                let plan: Option<Value> = row.try_get("plan").map_err(store_err)?;
                Ok(plan.map(PlanStatus::Ready).unwrap_or(PlanStatus::Empty))
            }
            "failed" => {
                let reason: Option<String> = row.try_get("failure_reason").map_err(store_err)?;
                Ok(PlanStatus::Failed {
                    reason: reason.unwrap_or_else(|| "unknown failure".to_string()),
                })
            }
            _ => Ok(PlanStatus::Empty),
        }
    }
}
