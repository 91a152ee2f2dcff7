use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{
    clean_credential, error_for_status, system_prompt, walk_model_ladder, TranslationEngine,
};

/// Default public endpoint for the Google generative language API
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Gemini client for the generateContent API
///
/// This is the high-availability fallback engine, on a different backend than
/// the primary so that an outage or quota exhaustion on one side does not
/// take the whole chain down.
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Ordered model identifiers to try
    models: Vec<String>,
}

impl std::fmt::Debug for Gemini {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gemini")
            .field("endpoint", &self.endpoint)
            .field("models", &self.models)
            .finish()
    }
}

/// Gemini generateContent request
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    /// System instruction guiding the model
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,

    /// Conversation contents
    contents: Vec<GeminiContent>,

    /// Generation parameters
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

/// A content block in a Gemini request or response
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role of the content author (user, model)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Parts making up the content
    pub parts: Vec<GeminiPart>,
}

/// A single part of a content block
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// Text payload
    pub text: String,
}

/// Generation parameters for the Gemini API
#[derive(Debug, Serialize)]
pub struct GeminiGenerationConfig {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini generateContent response
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    /// Candidate completions
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// Individual candidate in a Gemini response
#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    /// The candidate content
    pub content: GeminiContent,
}

/// Error body returned by the API on failure
#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

impl GeminiRequest {
    /// Create a new generateContent request with a single user message
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: text.into() }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: Some(0.3),
                max_output_tokens: Some(4096),
            }),
        }
    }

    /// Set the system instruction
    pub fn system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: instruction.into(),
            }],
        });
        self
    }
}

impl Gemini {
    /// Create a new Gemini client with the default model ladder
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new_with_models(
            api_key,
            endpoint,
            vec![
                "gemini-1.5-flash".to_string(),
                "gemini-1.5-flash-8b".to_string(),
            ],
        )
    }

    /// Create a new Gemini client with an explicit model ladder
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

    /// Complete a generateContent request against one model
    pub async fn complete(
        &self,
        model: &str,
        request: GeminiRequest,
    ) -> Result<GeminiResponse, ProviderError> {
        let api_url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            model
        );

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            let message = serde_json::from_str::<GeminiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or(body);
            error!("Gemini API error ({}): {}", status, message);
            return Err(error_for_status(status.as_u16(), message));
        }

        response
            .json::<GeminiResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Gemini response: {}", e)))
    }

    /// Extract the text payload from a Gemini response
    pub fn extract_text(response: &GeminiResponse) -> String {
        response
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl TranslationEngine for Gemini {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        walk_model_ladder(self.name(), &self.models, |model| async move {
            debug!(
                "Gemini translating {} chars with model {}",
                text.chars().count(),
                model
            );

            let request = GeminiRequest::new(format!(
                "Translate this technical content to {}. Maintain Markdown integrity:\n\n{}",
                target_language, text
            ))
            .system(system_prompt(target_language));

            let response = self.complete(model, request).await?;
            let content = Gemini::extract_text(&response).trim().to_string();
            if content.is_empty() {
                return Err(ProviderError::EmptyResponse);
            }
            Ok(content)
        })
        .await
    }
}
