//! The single completion call for a composed prompt

use std::sync::Arc;

use serde_json::Value;

use crate::domain::errors::{PlannerError, PlannerResult};
use crate::llm::{CompletionClient, CompletionRequest};

/// Sampling temperature for plan generation
const PLAN_TEMPERATURE: f32 = 1.0;

/// Issues one completion call and parses the result as a JSON plan document
///
/// No retry: a failed attempt surfaces to the caller, which records it on
/// the job slot.
pub async fn request_plan(
    client: &Arc<dyn CompletionClient>,
    prompt: String,
    max_tokens: u32,
) -> PlannerResult<Value> {
    let request = CompletionRequest {
        prompt,
        max_tokens,
        temperature: PLAN_TEMPERATURE,
        json_object: true,
    };

    let text = client.complete(request).await?;

    let plan: Value = serde_json::from_str(&text)
        .map_err(|e| PlannerError::MalformedCompletion(e.to_string()))?;
    if !plan.is_object() {
        return Err(PlannerError::MalformedCompletion(
            "completion is not a JSON object".to_string(),
        ));
    }
    Ok(plan)
}
