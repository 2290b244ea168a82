use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::PlannerResult;
use crate::domain::user::value_objects::Email;

/// User data for persistence
///
/// Simple struct for user CRUD operations
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: Email,
    pub password_hash: String,
    pub full_name: String,
    pub terms: bool,
    pub created_at: DateTime<Utc>,
}

/// Partial update applied to an existing user record
///
/// `password_hash` must already be hashed by the caller.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub password_hash: Option<String>,
    pub terms: Option<bool>,
}

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> PlannerResult<Uuid>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> PlannerResult<Option<User>>;

    /// Apply a partial update; fails with `NotFound` when no user matches
    async fn update(&self, email: &Email, update: UserUpdate) -> PlannerResult<()>;
}
