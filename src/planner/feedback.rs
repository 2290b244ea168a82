//! Template-learning sub-flow
//!
//! Once a category's rotation index reaches its trigger, the notes
//! accumulated for that category are sent to the model; a recurring item,
//! if the model finds one, is folded permanently into the stored template
//! and the buffer is cleared.

use std::sync::Arc;

use tracing::info;

use crate::domain::errors::PlannerResult;
use crate::domain::preferences::VacationType;
use crate::domain::repositories::{FeedbackRepository, TemplateRepository};
use crate::llm::{CompletionClient, CompletionRequest};

/// Reply the model gives when no recurring item exists in the notes
const NOT_FOUND_REPLY: &str = "NOT FOUND";

const FEEDBACK_TEMPERATURE: f32 = 1.0;

fn summary_prompt(notes: &[String]) -> String {
    format!(
        "Please review the array: [{}] If you find something that returns many times, \
         just send it back, without any other words. if didn't found - return 'NOT FOUND'",
        notes.join(", ")
    )
}

/// Runs one summarization attempt for a vacation category
///
/// A run with an empty buffer or a NOT FOUND reply leaves everything
/// untouched; the buffer is only cleared after a successful template append.
pub async fn summarize(
    vacation_type: VacationType,
    templates: &Arc<dyn TemplateRepository>,
    feedback: &Arc<dyn FeedbackRepository>,
    client: &Arc<dyn CompletionClient>,
    max_tokens: u32,
) -> PlannerResult<()> {
    let notes = feedback.notes(vacation_type).await?;
    if notes.is_empty() {
        return Ok(());
    }

    let request = CompletionRequest {
        prompt: summary_prompt(&notes),
        max_tokens,
        temperature: FEEDBACK_TEMPERATURE,
        json_object: false,
    };
    let reply = client.complete(request).await?;
    if reply == NOT_FOUND_REPLY {
        return Ok(());
    }

    templates
        .append_to_template(vacation_type, &format!(" In addition, {}", reply))
        .await?;
    feedback.clear(vacation_type).await?;

    info!(category = %vacation_type, "template extended with recurring preference");
    Ok(())
}
