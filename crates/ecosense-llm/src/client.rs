//! HTTP client for the Gemini `generateContent` REST endpoint.
//!
//! Every call requests a JSON MIME type and forwards the declared
//! [`Schema`] as `responseSchema`, so the reply text should already be a JSON
//! document. Whether it actually is remains the caller's problem.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::schema::Schema;
use crate::ModelInvoker;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for one Gemini model.
///
/// Use [`GeminiClient::from_config`] in binaries or
/// [`GeminiClient::with_base_url`] to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    temperature: f32,
    response_schema: &'a Schema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GeminiClient {
    /// Creates a client against `base_url` (the public API, a proxy, or wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`LlmError::InvalidBaseUrl`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        model: &str,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ecosense/0.1 (sustainability-relay)")
            .build()?;

        let endpoint = Self::endpoint_url(base_url, model)?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            temperature,
        })
    }

    /// Builds the client from process configuration.
    ///
    /// # Errors
    ///
    /// Same as [`GeminiClient::with_base_url`].
    pub fn from_config(config: &ecosense_core::AppConfig) -> Result<Self, LlmError> {
        Self::with_base_url(
            &config.llm_base_url,
            &config.gemini_api_key,
            &config.llm_model,
            config.llm_temperature,
            config.llm_timeout_secs,
        )
    }

    fn endpoint_url(base_url: &str, model: &str) -> Result<Url, LlmError> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model.trim()
        );
        Url::parse(&raw).map_err(|e| LlmError::InvalidBaseUrl(format!("'{raw}': {e}")))
    }

    /// Pulls the concatenated text of the first candidate out of a reply.
    fn extract_text(response: GenerateContentResponse) -> Result<String, LlmError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            return match response.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => Err(LlmError::Blocked(reason)),
                None => Err(LlmError::EmptyResponse),
            };
        };

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl ModelInvoker for GeminiClient {
    async fn invoke(&self, prompt: &str, schema: &Schema) -> Result<String, LlmError> {
        let request = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: self.temperature,
                response_schema: schema,
            },
        };

        tracing::debug!(endpoint = %self.endpoint, prompt_chars = prompt.len(), "invoking model");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body).map_or_else(
                |_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                },
                |envelope| envelope.error.message,
            );
            tracing::warn!(status = status.as_u16(), %message, "model API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Deserialize {
                context: "generateContent".to_string(),
                source: e,
            })?;

        Self::extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_base_and_model() {
        let url = GeminiClient::endpoint_url("https://example.test/", "gemini-2.0-flash")
            .expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn endpoint_url_rejects_garbage_base() {
        let err = GeminiClient::endpoint_url("not a url", "m").unwrap_err();
        assert!(matches!(err, LlmError::InvalidBaseUrl(_)));
    }

    #[test]
    fn request_body_carries_schema_and_json_mime_type() {
        let schema = Schema::Boolean;
        let request = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: 0.5,
                response_schema: &schema,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            value["generationConfig"]["responseSchema"]["type"],
            "BOOLEAN"
        );
    }

    #[test]
    fn extract_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}}]
        }))
        .unwrap();
        assert_eq!(GeminiClient::extract_text(response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn extract_text_reports_block_reason() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert!(matches!(
            GeminiClient::extract_text(response),
            Err(LlmError::Blocked(ref r)) if r == "SAFETY"
        ));
    }
}
