use thiserror::Error;

use crate::llm::LlmError;

/// Errors that can occur in the plan-generation pipeline
///
/// Composition-time errors (`NotFound`, `TemplateMismatch`) surface to the
/// submitting client synchronously; background errors (`Upstream`,
/// `MalformedCompletion`) are recorded on the job slot and only visible
/// through polling.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("template mismatch: {0}")]
    TemplateMismatch(String),

    #[error("completion service error: {0}")]
    Upstream(#[from] LlmError),

    #[error("malformed completion: {0}")]
    MalformedCompletion(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
