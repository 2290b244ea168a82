//! Generation-job coordination
//!
//! Accepts a generation request, resets the requester's result slot,
//! composes the prompt eagerly, and schedules the completion call to run
//! out-of-band behind a process-wide admission gate.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{error, warn};

use crate::domain::errors::PlannerResult;
use crate::domain::preferences::{TripPreferences, VacationType};
use crate::domain::repositories::{
    FeedbackRepository, PlanRepository, TemplateRepository, FEEDBACK_TRIGGER_INDEX,
};
use crate::llm::CompletionClient;

use super::{composer, feedback, invoker};

/// Tunables for the generation pipeline
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Number of background completion calls allowed in flight at once;
    /// one by default, so concurrent jobs fully serialize on the external
    /// service
    pub completion_permits: usize,
    pub max_plan_tokens: u32,
    pub max_feedback_tokens: u32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            completion_permits: 1,
            max_plan_tokens: 4096,
            max_feedback_tokens: 2500,
        }
    }
}

/// Coordinates generation jobs
///
/// Owns the only transition of a job slot from *empty* to *ready* or
/// *failed*. Submission is last-write-wins: a new request for a key clears
/// the slot immediately and does not cancel an earlier in-flight job for the
/// same key; whichever background write lands last is what polling sees.
pub struct PlanCoordinator {
    templates: Arc<dyn TemplateRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    plans: Arc<dyn PlanRepository>,
    client: Arc<dyn CompletionClient>,
    gate: Arc<Semaphore>,
    config: CoordinatorConfig,
}

impl PlanCoordinator {
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        plans: Arc<dyn PlanRepository>,
        client: Arc<dyn CompletionClient>,
        config: CoordinatorConfig,
    ) -> Self {
        let gate = Arc::new(Semaphore::new(config.completion_permits.max(1)));
        Self {
            templates,
            feedback,
            plans,
            client,
            gate,
            config,
        }
    }

    /// Accepts a generation job for `requester_key`
    ///
    /// Everything up to scheduling happens before this returns: the stored
    /// result is reset so a poll can never observe a stale plan, the
    /// template rotation advances, the additional notes are recorded, and
    /// the prompt is composed. Composition-time errors surface here; the
    /// completion call runs in a background task whose outcome is only
    /// visible through polling.
    pub async fn submit(&self, requester_key: &str, prefs: &TripPreferences) -> PlannerResult<()> {
        self.plans.clear(requester_key).await?;

        let fragment = self.templates.increment_and_fetch(prefs.vacation_type).await?;
        if fragment.rotation_index == FEEDBACK_TRIGGER_INDEX {
            self.spawn_feedback(prefs.vacation_type);
        }

        for note in &prefs.additional_data {
            self.feedback.push_note(prefs.vacation_type, note).await?;
        }

        let general = self.templates.general_template().await?;
        let instructions = self.templates.instructions().await?;
        let prompt = composer::compose(&fragment.template, prefs, &general, &instructions)?;

        self.spawn_generation(requester_key.to_string(), prompt);
        Ok(())
    }

    /// Re-submits an existing plan for improvement through the same
    /// background pipeline
    pub async fn submit_improvement(
        &self,
        requester_key: &str,
        plan: &Value,
        general_override: Option<&str>,
    ) -> PlannerResult<()> {
        self.plans.clear(requester_key).await?;

        let general = match general_override {
            Some(template) => template.to_string(),
            None => self.templates.general_template().await?,
        };
        let instructions = self.templates.instructions().await?;
        let prompt = composer::improvement_prompt(plan, &general, &instructions);

        self.spawn_generation(requester_key.to_string(), prompt);
        Ok(())
    }

    fn spawn_generation(&self, requester_key: String, prompt: String) {
        let gate = Arc::clone(&self.gate);
        let client = Arc::clone(&self.client);
        let plans = Arc::clone(&self.plans);
        let max_tokens = self.config.max_plan_tokens;

        tokio::spawn(async move {
            let _permit = match gate.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return, // gate closed during shutdown
            };

            match invoker::request_plan(&client, prompt, max_tokens).await {
                Ok(plan) => {
                    if let Err(e) = plans.mark_ready(&requester_key, &plan).await {
                        error!(key = %requester_key, error = %e, "failed to store finished plan");
                    }
                }
                Err(e) => {
                    error!(key = %requester_key, error = %e, "plan generation failed");
                    if let Err(store_err) = plans.mark_failed(&requester_key, &e.to_string()).await
                    {
                        error!(
                            key = %requester_key,
                            error = %store_err,
                            "failed to record generation failure"
                        );
                    }
                }
            }
        });
    }

    /// Fire-and-forget summarization run; failures are logged, never fatal
    /// to the request that triggered them
    fn spawn_feedback(&self, vacation_type: VacationType) {
        let gate = Arc::clone(&self.gate);
        let templates = Arc::clone(&self.templates);
        let feedback = Arc::clone(&self.feedback);
        let client = Arc::clone(&self.client);
        let max_tokens = self.config.max_feedback_tokens;

        tokio::spawn(async move {
            let _permit = match gate.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return,
            };

            if let Err(e) =
                feedback::summarize(vacation_type, &templates, &feedback, &client, max_tokens).await
            {
                warn!(category = %vacation_type, error = %e, "feedback summarization failed");
            }
        });
    }
}
