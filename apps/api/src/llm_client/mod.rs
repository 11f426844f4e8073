/// LLM Client: the single point of entry for all Claude API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Everything goes through `workflow::gateway`, which goes through here.
///
/// The API key is supplied per call: it belongs to the browser user and is
/// never stored server-side beyond the optional fallback in `Config`.
/// Calls are not retried; the user re-triggers failed actions.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
/// Hardcoded so every deployment tailors with the same model.
pub const MODEL: &str = "claude-sonnet-4-5";
/// Full resumes round-trip through the model, so leave room for long output.
const MAX_TOKENS: u32 = 8192;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Thin wrapper over the Anthropic Messages API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
}

impl LlmClient {
    pub fn new(timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    /// Makes a single call to the Claude API, returning the full response object.
    pub async fn call(
        &self,
        api_key: &str,
        prompt: &str,
        system: &str,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let llm_response = parse_response(&body)?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }

    /// Calls the LLM and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        api_key: &str,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(api_key, prompt, system).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(text);
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Decodes a successful Messages API body. A body that is not the expected
/// envelope is a parse error, same as unreadable model text.
fn parse_response(body: &str) -> Result<LlmResponse, LlmError> {
    serde_json::from_str(body).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"basics\": {}}\n```";
        assert_eq!(strip_json_fences(input), "{\"basics\": {}}");
    }

    #[test]
    fn test_strip_json_fences_unterminated() {
        let input = "```\n{\"basics\": {}}";
        assert_eq!(strip_json_fences(input), "{\"basics\": {}}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"basics\": {}}\n";
        assert_eq!(strip_json_fences(input), "{\"basics\": {}}");
    }

    #[test]
    fn test_response_text_picks_first_text_block() {
        let response: LlmResponse = serde_json::from_str(
            r#"{
                "content": [{"type": "thinking"}, {"type": "text", "text": "{}"}],
                "usage": {"input_tokens": 10, "output_tokens": 2}
            }"#,
        )
        .unwrap();
        assert_eq!(response.text(), Some("{}"));
    }

    #[test]
    fn test_unexpected_envelope_is_parse_error() {
        assert!(matches!(
            parse_response("<html>502 Bad Gateway</html>"),
            Err(LlmError::Parse(_))
        ));
        assert!(matches!(
            parse_response(r#"{"content": "not a list"}"#),
            Err(LlmError::Parse(_))
        ));
    }

    #[test]
    fn test_client_builds_with_timeout() {
        assert!(LlmClient::new(Duration::from_secs(5)).is_ok());
    }
}
