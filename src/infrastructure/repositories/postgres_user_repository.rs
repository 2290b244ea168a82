use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::store_err;
use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::repositories::{User, UserRepository, UserUpdate};
use crate::domain::user::value_objects::Email;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: sqlx::postgres::PgRow) -> PlannerResult<User> {
    let email: String = row.try_get("email").map_err(store_err)?;
    let email = Email::new(&email)
        .map_err(|e| PlannerError::Unavailable(format!("Invalid email from database: {}", e)))?;

    Ok(User {
        id: row.try_get("id").map_err(store_err)?,
        email,
        password_hash: row.try_get("password_hash").map_err(store_err)?,
        full_name: row.try_get("full_name").map_err(store_err)?,
        terms: row.try_get("terms").map_err(store_err)?,
        created_at: row.try_get("created_at").map_err(store_err)?,
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> PlannerResult<Uuid> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, full_name, terms, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.terms)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(user.id)
    }

    async fn find_by_email(&self, email: &Email) -> PlannerResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, full_name, terms, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        row.map(row_to_user).transpose()
    }

    async fn update(&self, email: &Email, update: UserUpdate) -> PlannerResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                password_hash = COALESCE($3, password_hash),
                terms = COALESCE($4, terms)
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .bind(update.full_name)
        .bind(update.password_hash)
        .bind(update.terms)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(PlannerError::NotFound("user".to_string()));
        }
        Ok(())
    }
}
