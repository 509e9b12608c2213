use ecosense_llm::LlmError;
use thiserror::Error;

/// Why a model reply could not be turned into an outward result.
#[derive(Debug, Error)]
pub enum Malformed {
    #[error("LLM returned invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("LLM returned an invalid analysis: {0}")]
    Contract(String),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required request field was missing or blank.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("model invocation failed: {0}")]
    ModelInvocation(#[from] LlmError),

    /// `raw` holds the model's text for server-side logs only.
    #[error("{detail}")]
    MalformedModelOutput {
        #[source]
        detail: Malformed,
        raw: String,
    },

    /// No supporting content was found; informational rather than a fault.
    #[error("no data found: {0}")]
    NoDataFound(String),
}

impl AnalysisError {
    /// Message safe to return to the caller. Never includes the raw model text.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            AnalysisError::InvalidInput(message) | AnalysisError::NoDataFound(message) => {
                message.clone()
            }
            AnalysisError::ModelInvocation(LlmError::EmptyResponse) => {
                "LLM returned an empty response.".to_string()
            }
            AnalysisError::ModelInvocation(err) => {
                format!("An error occurred during analysis: {err}")
            }
            AnalysisError::MalformedModelOutput {
                detail: Malformed::InvalidJson(err),
                ..
            } => format!("LLM returned invalid JSON: {err}. Raw response logged for debugging."),
            AnalysisError::MalformedModelOutput {
                detail: Malformed::Contract(reason),
                ..
            } => format!("LLM returned an invalid analysis: {reason}"),
        }
    }
}
