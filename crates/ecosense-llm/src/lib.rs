//! Boundary over the hosted language model.
//!
//! Callers depend on [`ModelInvoker`]; production wiring uses [`GeminiClient`],
//! tests substitute a canned implementation.

pub mod client;
pub mod error;
pub mod schema;

use async_trait::async_trait;

pub use client::GeminiClient;
pub use error::LlmError;
pub use schema::Schema;

/// Sends one prompt plus its declared output schema and returns the model's
/// raw JSON text. One call per request; no retries.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport failure, API error status, a blocked
    /// prompt, or an empty reply.
    async fn invoke(&self, prompt: &str, schema: &Schema) -> Result<String, LlmError>;
}
