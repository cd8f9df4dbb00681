//! Gemini Completion Provider
//!
//! Text completion through the Gemini `generateContent` API, with a separate
//! (cheaper) model for fast calls such as tagging and chunk summaries.

use async_trait::async_trait;
use kioku::{CompletionProvider, DomainError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_FAST_MODEL: &str = "gemini-2.0-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone)]
pub struct GeminiCompletionProvider {
    client: Client,
    api_key: String,
    model: String,
    fast_model: String,
}

impl GeminiCompletionProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            fast_model: DEFAULT_FAST_MODEL.to_string(),
        }
    }

    pub fn with_models(mut self, model: impl Into<String>, fast_model: impl Into<String>) -> Self {
        self.model = model.into();
        self.fast_model = fast_model.into();
        self
    }
}

#[async_trait]
impl CompletionProvider for GeminiCompletionProvider {
    async fn complete(&self, prompt: &str, use_fast_model: bool) -> Result<String, DomainError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE,
            self.model_id(use_fast_model),
            self.api_key
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let result: GeminiResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        first_text(result)
            .ok_or_else(|| DomainError::ExternalService("Empty Gemini response".into()))
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_id(&self, use_fast_model: bool) -> &str {
        if use_fast_model {
            &self.fast_model
        } else {
            &self.model
        }
    }
}

fn first_text(response: GeminiResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
}

// Gemini API types
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}
