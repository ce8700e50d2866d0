use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::config::{DetectiveConfig, Provider};
use crate::error::{Error, Result, UpstreamError};
use crate::retry::RetryPolicy;

/// A hosted model that turns a (system, user) prompt pair into text.
pub trait CompletionModel: Send + Sync {
    fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> impl Future<Output = std::result::Result<String, UpstreamError>> + Send;

    fn describe(&self) -> String;

    fn provider_name(&self) -> &'static str;
}

/// Client for OpenAI-compatible chat completion endpoints (Groq, OpenAI)
pub struct ChatClient {
    provider: Provider,
    url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    retry: RetryPolicy,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ChatClient {
    pub fn new(config: &DetectiveConfig) -> Result<Self> {
        let provider_cfg = &config.provider;
        let api_key = provider_cfg.resolve_api_key()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(provider_cfg.request_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            provider: provider_cfg.provider,
            url: provider_cfg.url().to_string(),
            model: provider_cfg.model().to_string(),
            api_key,
            temperature: provider_cfg.temperature,
            max_tokens: provider_cfg.max_tokens,
            retry: RetryPolicy::from_config(&config.retry),
            client,
        })
    }

    fn build_request<'a>(&'a self, system: &'a str, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: self
                .provider
                .supports_json_mode()
                .then_some(ResponseFormat { kind: "json_object" }),
        }
    }

    async fn send_once(&self, request: &ChatRequest<'_>) -> std::result::Result<String, UpstreamError> {
        let provider = self.provider.name();

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { provider, source })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(UpstreamError::RateLimited { provider });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                provider,
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| UpstreamError::Transport { provider, source })?;

        parse_chat_response(provider, &body)
    }
}

/// Pull the first choice's message content out of a chat completion body
pub(crate) fn parse_chat_response(
    provider: &'static str,
    body: &str,
) -> std::result::Result<String, UpstreamError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| UpstreamError::MalformedResponse {
            provider,
            message: format!("unexpected completion body: {}", e),
        })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| UpstreamError::MalformedResponse {
            provider,
            message: "completion has no message content".to_string(),
        })
}

impl CompletionModel for ChatClient {
    async fn complete(&self, system: &str, prompt: &str) -> std::result::Result<String, UpstreamError> {
        let request = self.build_request(system, prompt);
        debug!(provider = %self.provider, model = %self.model, prompt_chars = prompt.len(), "Sending completion request");

        self.retry
            .retry("chat_completion", || self.send_once(&request))
            .await
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.provider.name().to_uppercase(), self.model)
    }

    fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_for(provider: Provider) -> ChatClient {
        let mut config = DetectiveConfig::for_provider(provider);
        config.provider.api_key = Some("test_key".into());
        ChatClient::new(&config).unwrap()
    }

    #[test]
    fn test_request_shape_groq() {
        let client = client_for(Provider::Groq);
        let request = serde_json::to_value(client.build_request("sys", "user text")).unwrap();

        assert_eq!(request["model"], json!("llama-3.3-70b-versatile"));
        assert_eq!(request["messages"][0], json!({"role": "system", "content": "sys"}));
        assert_eq!(request["messages"][1], json!({"role": "user", "content": "user text"}));
        assert_eq!(request["max_tokens"], json!(4000));
        assert!(request.get("response_format").is_none());
    }

    #[test]
    fn test_request_shape_openai_uses_json_mode() {
        let client = client_for(Provider::OpenAi);
        let request = serde_json::to_value(client.build_request("sys", "user")).unwrap();
        assert_eq!(request["response_format"], json!({"type": "json_object"}));
        assert_eq!(client.describe(), "OPENAI (gpt-4o)");
    }

    #[test]
    fn test_parse_chat_response() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "{\"entities\": []}"}}]}"#;
        assert_eq!(parse_chat_response("groq", body).unwrap(), r#"{"entities": []}"#);
    }

    #[test]
    fn test_parse_chat_response_without_choices() {
        let err = parse_chat_response("groq", r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, UpstreamError::MalformedResponse { .. }));

        let err = parse_chat_response("groq", "<html>gateway</html>").unwrap_err();
        assert!(!err.is_transient());
    }
}
