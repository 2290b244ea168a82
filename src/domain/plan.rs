use serde_json::Value;

/// Requester key of the shared demo identity
///
/// Plans generated for this key are served to every visitor and must not be
/// persisted by clients; the poll handler annotates them accordingly.
pub const GLOBAL_KEY: &str = "global";

/// Lifecycle of a generation job's result slot
///
/// A slot is `Empty` until its background task finishes, `Ready` once the
/// parsed plan has been stored, and `Failed` when the completion call or the
/// result parse went wrong. Every new submission resets the slot to `Empty`
/// before any other work happens.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanStatus {
    Empty,
    Ready(Value),
    Failed { reason: String },
}

impl PlanStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, PlanStatus::Ready(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PlanStatus::Empty)
    }
}

/// Annotates a finished plan with its `saveable` flag before it is returned
/// to a polling client
///
/// Plans belonging to the shared demo identity are marked non-saveable; this
/// is a presentation concern, the store itself does not enforce it.
pub fn annotate_saveable(mut plan: Value, requester_key: &str) -> Value {
    if let Some(map) = plan.as_object_mut() {
        map.insert(
            "saveable".to_string(),
            Value::Bool(requester_key != GLOBAL_KEY),
        );
    }
    plan
}
