use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::PlannerResult;
use crate::domain::preferences::VacationType;

/// Number of rotation positions before a template's index wraps back to zero
pub const ROTATION_MODULUS: u8 = 10;

/// Post-increment rotation position that triggers feedback summarization
pub const FEEDBACK_TRIGGER_INDEX: u8 = 9;

/// One stored prompt fragment, fetched per vacation category
#[derive(Debug, Clone)]
pub struct TemplateFragment {
    /// Parameterized template text with named placeholders
    pub template: String,
    /// Rotation position after the fetch, 0..[`ROTATION_MODULUS`]
    pub rotation_index: u8,
    /// Optional JSON output-schema fragment embedded in the stored document
    pub output_schema: Option<Value>,
}

/// Repository trait for stored prompt templates
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Fetch the fragment for a category, atomically advancing its rotation
    /// index modulo [`ROTATION_MODULUS`]
    ///
    /// The returned index is the post-increment value. This is deliberately
    /// not an idempotent read.
    async fn increment_and_fetch(&self, vacation_type: VacationType)
        -> PlannerResult<TemplateFragment>;

    /// Permanently extend a category's template with learned text
    async fn append_to_template(&self, vacation_type: VacationType, text: &str)
        -> PlannerResult<()>;

    /// The shared template appended to every composed prompt
    async fn general_template(&self) -> PlannerResult<String>;

    /// The shared instruction suffix appended to every composed prompt
    async fn instructions(&self) -> PlannerResult<String>;

    /// Replace the shared general template
    async fn set_general_template(&self, template: &str) -> PlannerResult<()>;
}
