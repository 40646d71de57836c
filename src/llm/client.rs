//! Async LLM client for personalization prompts
//!
//! A model-agnostic HTTP client treating the endpoint as opaque text
//! completion. Anthropic, OpenAI-compatible chat, and plain completion
//! endpoints are told apart by URL. No retry: a failed call is surfaced to
//! the caller with the upstream status and body.

use crate::core::config::LlmConfig;
use crate::core::error::{MentorError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
    /// `{model, prompt, max_tokens, temperature}` in, completion text out
    Completion,
}

/// What the core sends, independent of wire format
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Async LLM client for making API calls
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        let defaults = LlmConfig::default();
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            api_format,
        }
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else if url.contains("chat/completions") {
            ApiFormat::OpenAI
        } else {
            ApiFormat::Completion
        }
    }

    /// Create a client from config, reading the key from `config.api_key_env`
    ///
    /// `LLM_API_URL` and `LLM_MODEL` override the configured values when set.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| MentorError::Config(format!("{} not set", config.api_key_env)))?;
        let api_url = std::env::var("LLM_API_URL").unwrap_or_else(|_| config.api_url.clone());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| config.model.clone());

        let mut client = Self::new(api_key, api_url, model);
        client.max_tokens = config.max_tokens;
        client.temperature = config.temperature;
        Ok(client)
    }

    /// Create a client from environment variables with default settings
    pub fn from_env() -> Result<Self> {
        Self::from_config(&LlmConfig::default())
    }

    pub fn api_format(&self) -> &ApiFormat {
        &self.api_format
    }

    /// Request the client would send for `prompt`
    pub fn request_for(&self, prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Send a completion request and return the text
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = self.request_for(prompt);
        tracing::debug!(model = %request.model, format = ?self.api_format, "llm request");
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(request).await,
            ApiFormat::OpenAI => self.complete_openai(request).await,
            ApiFormat::Completion => self.complete_plain(request).await,
        }
    }

    async fn send<T: Serialize>(&self, builder: reqwest::RequestBuilder, body: &T) -> Result<reqwest::Response> {
        let response = builder
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| MentorError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MentorError::Network {
                status: Some(status.as_u16()),
                body: error_text,
            });
        }

        Ok(response)
    }

    async fn complete_anthropic(&self, request: CompletionRequest) -> Result<String> {
        let body = AnthropicRequest {
            model: request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![Message {
                role: "user".into(),
                content: request.prompt,
            }],
        };

        let builder = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01");

        let completion: AnthropicResponse = self
            .send(builder, &body)
            .await?
            .json()
            .await
            .map_err(|e| MentorError::transport(e.to_string()))?;

        completion
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| MentorError::transport("Empty response"))
    }

    async fn complete_openai(&self, request: CompletionRequest) -> Result<String> {
        let body = OpenAIRequest {
            model: request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![Message {
                role: "user".into(),
                content: request.prompt,
            }],
        };

        let builder = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key));

        let completion: OpenAIResponse = self
            .send(builder, &body)
            .await?
            .json()
            .await
            .map_err(|e| MentorError::transport(e.to_string()))?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| MentorError::transport("Empty response"))
    }

    async fn complete_plain(&self, request: CompletionRequest) -> Result<String> {
        let builder = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key));

        let completion: PlainResponse = self
            .send(builder, &request)
            .await?
            .json()
            .await
            .map_err(|e| MentorError::transport(e.to_string()))?;

        completion.into_text()
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

// OpenAI-compatible API format (DeepSeek, OpenAI, etc.)
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

// Plain completion endpoint: either a completion or an error payload
#[derive(Deserialize)]
struct PlainResponse {
    #[serde(default)]
    completion: Option<String>,
    #[serde(default)]
    choices: Vec<PlainChoice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct PlainChoice {
    text: String,
}

impl PlainResponse {
    fn into_text(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(MentorError::Network {
                status: None,
                body: error.to_string(),
            });
        }
        self.completion
            .or_else(|| self.choices.into_iter().next().map(|c| c.text))
            .ok_or_else(|| MentorError::transport("Empty response"))
    }
}

// Shared
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}
