use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};

use super::store_err;
use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::preferences::VacationType;
use crate::domain::repositories::{TemplateFragment, TemplateRepository};

/// PostgreSQL implementation of TemplateRepository
///
/// Templates live one row per vacation category; the shared general template
/// and instruction suffix live in a singleton row.
pub struct PostgresTemplateRepository {
    pool: PgPool,
}

impl PostgresTemplateRepository {
    /// Creates a new PostgresTemplateRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for PostgresTemplateRepository {
    async fn increment_and_fetch(
        &self,
        vacation_type: VacationType,
    ) -> PlannerResult<TemplateFragment> {
        // single-statement update keeps the advance atomic per category row
        let row = sqlx::query(
            r#"
            UPDATE templates
            SET rotation_index = (rotation_index + 1) % 10
            WHERE vacation_type = $1
            RETURNING template, rotation_index, output_schema
            "#,
        )
        .bind(vacation_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?
        .ok_or_else(|| PlannerError::NotFound("template".to_string()))?;

        let rotation_index: i16 = row.try_get("rotation_index").map_err(store_err)?;

        Ok(TemplateFragment {
            template: row.try_get("template").map_err(store_err)?,
            rotation_index: rotation_index as u8,
            output_schema: row
                .try_get::<Option<Value>, _>("output_schema")
                .map_err(store_err)?,
        })
    }

    async fn append_to_template(
        &self,
        vacation_type: VacationType,
        text: &str,
    ) -> PlannerResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE templates
            SET template = template || $2
            WHERE vacation_type = $1
            "#,
        )
        .bind(vacation_type.as_str())
        .bind(text)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(PlannerError::NotFound("template".to_string()));
        }
        Ok(())
    }

    async fn general_template(&self) -> PlannerResult<String> {
        let row = sqlx::query("SELECT general_template FROM shared_templates LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?
            .ok_or_else(|| PlannerError::NotFound("general template".to_string()))?;

        row.try_get("general_template").map_err(store_err)
    }

    async fn instructions(&self) -> PlannerResult<String> {
        let row = sqlx::query("SELECT instructions FROM shared_templates LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?
            .ok_or_else(|| PlannerError::NotFound("instructions".to_string()))?;

        row.try_get("instructions").map_err(store_err)
    }

    async fn set_general_template(&self, template: &str) -> PlannerResult<()> {
        let result = sqlx::query("UPDATE shared_templates SET general_template = $1")
            .bind(template)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(PlannerError::NotFound("general template".to_string()));
        }
        Ok(())
    }
}
