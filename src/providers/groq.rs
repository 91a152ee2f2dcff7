use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{
    clean_credential, error_for_status, system_prompt, walk_model_ladder, TranslationEngine,
};

/// Default public endpoint for the Groq OpenAI-compatible API
const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Groq client for the chat-completions API
///
/// This is the low-latency primary engine. It keeps an ordered ladder of
/// model identifiers and advances to the next one when a model is reported
/// unavailable, before surfacing the failure to the caller.
pub struct Groq {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Ordered model identifiers to try
    models: Vec<String>,
}

impl std::fmt::Debug for Groq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Groq")
            .field("endpoint", &self.endpoint)
            .field("models", &self.models)
            .finish()
    }
}

/// Groq chat-completions request
#[derive(Debug, Serialize)]
pub struct GroqRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<GroqMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    max_tokens: u32,

    /// Top probability mass to consider (nucleus sampling)
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,

    /// Whether to stream the response
    stream: bool,
}

/// Groq message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Groq chat-completions response
#[derive(Debug, Deserialize)]
pub struct GroqResponse {
    /// The completion choices
    pub choices: Vec<GroqChoice>,
}

/// Individual completion choice in a Groq response
#[derive(Debug, Deserialize)]
pub struct GroqChoice {
    /// The response message
    pub message: GroqMessage,
}

/// Error body returned by the API on failure
#[derive(Debug, Deserialize)]
struct GroqErrorBody {
    error: Option<GroqErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GroqErrorDetail {
    message: String,
}

impl GroqRequest {
    /// Create a new chat-completions request
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: Some(0.3),
            max_tokens,
            top_p: Some(1.0),
            stream: false,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(GroqMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Groq {
    /// Create a new Groq client with the default model ladder
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new_with_models(
            api_key,
            endpoint,
            vec![
                "llama-3.3-70b-versatile".to_string(),
                "llama-3.1-8b-instant".to_string(),
            ],
        )
    }

    /// Create a new Groq client with an explicit model ladder
    pub fn new_with_models(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        models: Vec<String>,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: clean_credential(&api_key.into()),
            endpoint: if endpoint.is_empty() {
                DEFAULT_ENDPOINT.to_string()
            } else {
                endpoint
            },
            models,
        }
    }

    /// Complete a chat-completions request against one model
    pub async fn complete(&self, request: GroqRequest) -> Result<GroqResponse, ProviderError> {
        let api_url = format!(
            "{}/chat/completions",
            self.endpoint.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Groq request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            let message = serde_json::from_str::<GroqErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or(body);
            error!("Groq API error ({}): {}", status, message);
            return Err(error_for_status(status.as_u16(), message));
        }

        response
            .json::<GroqResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Groq response: {}", e)))
    }
}

#[async_trait]
impl TranslationEngine for Groq {
    fn name(&self) -> &str {
        "groq"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        walk_model_ladder(self.name(), &self.models, |model| async move {
            debug!(
                "Groq translating {} chars with model {}",
                text.chars().count(),
                model
            );

            let request = GroqRequest::new(model, 4096)
                .add_message("system", system_prompt(target_language))
                .add_message("user", text);

            let response = self.complete(request).await?;
            let content = response
                .choices
                .first()
                .map(|c| c.message.content.trim().to_string())
                .unwrap_or_default();
            if content.is_empty() {
                return Err(ProviderError::EmptyResponse);
            }
            Ok(content)
        })
        .await
    }
}
