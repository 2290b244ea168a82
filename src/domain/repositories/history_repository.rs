use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::domain::errors::PlannerResult;

/// One stored history item with its per-user index
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub index: i32,
    pub data: Value,
}

/// Repository trait for per-user plan history
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Provision an empty history document for a new account; idempotent
    async fn init(&self, email: &str) -> PlannerResult<()>;

    /// Append an entry under the next per-user index and return that index
    ///
    /// Creates the history document on the fly when it does not exist yet.
    async fn append(&self, email: &str, data: Value) -> PlannerResult<i32>;

    /// Remove the entry at `index`; fails with `NotFound` when absent
    async fn remove(&self, email: &str, index: i32) -> PlannerResult<()>;

    /// All entries in index order; fails with `NotFound` for an unknown user
    async fn entries(&self, email: &str) -> PlannerResult<Vec<HistoryEntry>>;
}
