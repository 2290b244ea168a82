use async_trait::async_trait;

use crate::domain::errors::PlannerResult;
use crate::domain::preferences::VacationType;

/// Repository trait for the per-category feedback buffer
///
/// Free-text notes accumulate across many requests for a vacation category
/// until the summarization flow drains them into the template.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Record one free-text note against a vacation category
    async fn push_note(&self, vacation_type: VacationType, note: &str) -> PlannerResult<()>;

    /// All notes currently buffered for a category
    async fn notes(&self, vacation_type: VacationType) -> PlannerResult<Vec<String>>;

    /// Discard a category's buffered notes
    async fn clear(&self, vacation_type: VacationType) -> PlannerResult<()>;
}
