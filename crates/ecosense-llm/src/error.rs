use thiserror::Error;

/// Failures of the single model invocation.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The model API answered with a non-2xx status.
    #[error("model API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The prompt was rejected by the provider's safety filters.
    #[error("prompt was blocked by the model provider: {0}")]
    Blocked(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,

    /// The API envelope (not the model's own JSON) could not be decoded.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model endpoint: {0}")]
    InvalidBaseUrl(String),
}
