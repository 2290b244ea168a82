use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::PlannerResult;
use crate::domain::plan::PlanStatus;

/// Repository trait for generation-job result slots
///
/// Slots are keyed by requester identity (an email address or the shared
/// demo key). Implementations must provide atomic single-slot upserts.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Reset the slot to [`PlanStatus::Empty`], creating it if missing
    async fn clear(&self, requester_key: &str) -> PlannerResult<()>;

    /// Store a finished plan, transitioning the slot to [`PlanStatus::Ready`]
    async fn mark_ready(&self, requester_key: &str, plan: &Value) -> PlannerResult<()>;

    /// Record a background failure so polling can distinguish "never
    /// finished" from "failed"
    async fn mark_failed(&self, requester_key: &str, reason: &str) -> PlannerResult<()>;

    /// Current status of the slot; a missing slot reads as
    /// [`PlanStatus::Empty`] so polling an unknown key never errors
    async fn status(&self, requester_key: &str) -> PlannerResult<PlanStatus>;
}
