//! Client for the hosted chat-completion service.
//!
//! A completion is one blocking round trip: the personality's system prompt
//! and the latest user message go out, the generated text comes back
//! unchanged. Nothing here retries, streams, or imposes a timeout.

use async_trait::async_trait;
use std::error::Error;
use std::fmt;
use tracing::debug;

use crate::api::{ChatCompletionResponse, ChatMessage, ChatRequest};
use crate::core::providers::ProviderSession;
use crate::utils::url::construct_api_url;

pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Failure of a single completion call.
#[derive(Debug)]
pub enum CompletionError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    Transport(reqwest::Error),

    /// The service answered with a non-success status.
    Api {
        status: u16,
        /// One-line description suitable for a status bar.
        summary: String,
        /// Formatted body, pretty-printed when it is JSON.
        detail: String,
    },

    /// The body was not a chat-completion payload.
    Decode(serde_json::Error),

    /// The payload had no choices or no text.
    EmptyResponse,
}

impl CompletionError {
    /// Multi-line description including the formatted response body, when
    /// there is one.
    pub fn detail(&self) -> String {
        match self {
            CompletionError::Api { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Transport(err) => {
                write!(f, "Request to completion service failed: {err}")
            }
            CompletionError::Api {
                status, summary, ..
            } => write!(f, "API Error (HTTP {status}): {summary}"),
            CompletionError::Decode(err) => {
                write!(f, "Completion service returned malformed JSON: {err}")
            }
            CompletionError::EmptyResponse => {
                write!(f, "Completion service returned an empty response")
            }
        }
    }
}

impl Error for CompletionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CompletionError::Transport(err) => Some(err),
            CompletionError::Decode(err) => Some(err),
            CompletionError::Api { .. } | CompletionError::EmptyResponse => None,
        }
    }
}

/// Seam between the conversation controller and the remote model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError>;
}

/// `CompletionClient` backed by an OpenAI-compatible HTTP endpoint.
#[derive(Clone, Debug)]
pub struct HostedCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl HostedCompletionClient {
    pub fn new(session: ProviderSession, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: session.base_url,
            api_key: session.api_key,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    fn build_request(&self, system_prompt: &str, user_message: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_message),
            ],
            temperature: self.temperature,
            stream: false,
        }
    }
}

#[async_trait]
impl CompletionClient for HostedCompletionClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError> {
        let request = self.build_request(system_prompt, user_message);
        let chat_url = construct_api_url(&self.base_url, "chat/completions");
        debug!(model = %self.model, url = %chat_url, "sending completion request");

        let response = self
            .client
            .post(chat_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(CompletionError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(CompletionError::Transport)?;

        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                summary: summarize_api_error(&body),
                detail: format_api_error(&body),
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(CompletionError::Decode)?;
        let content = parsed
            .into_first_content()
            .filter(|content| !content.is_empty())
            .ok_or(CompletionError::EmptyResponse)?;

        debug!(chars = content.chars().count(), "completion received");
        Ok(content)
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.trim().to_string()
    })
}

/// One-line summary of an error body: the JSON `message` if there is one,
/// otherwise the whitespace-collapsed body.
fn summarize_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| extract_error_summary(&value))
        .filter(|summary| !summary.is_empty())
        .unwrap_or_else(|| trimmed.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error:\n```\n<empty>\n```".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            if let Some(summary) = extract_error_summary(&json_value) {
                if !summary.is_empty() {
                    return format!("API Error: {}\n```json\n{}\n```", summary, pretty_json);
                }
            }
            return format!("API Error:\n```json\n{}\n```", pretty_json);
        }
    }

    if trimmed.starts_with('<') && trimmed.ends_with('>') {
        format!("API Error:\n```xml\n{}\n```", trimmed)
    } else {
        format!("API Error:\n```\n{}\n```", trimmed)
    }
}
