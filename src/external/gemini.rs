//! Generative-language API client
//!
//! Client for Google's Gemini `generateContent` REST endpoint. Multi-turn
//! history is passed as alternating user/model `Content` entries; sampling
//! is configured per call.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Generative-language API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

/// A single conversation turn in the provider's schema
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

impl Content {
    /// A "user" turn wrapping plain text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }

    /// A "model" turn wrapping plain text
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Per-call sampling configuration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a new GeminiClient
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url,
            model,
        }
    }

    /// Send a multi-turn conversation to the model and return its reply text
    pub async fn generate(
        &self,
        contents: Vec<Content>,
        generation_config: GenerationConfig,
    ) -> AppResult<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents,
            generation_config,
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::GenerativeApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::GenerativeApi(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::GenerativeApi(format!("Failed to parse response: {}", e)))?;

        extract_text(data)
            .ok_or_else(|| AppError::GenerativeApi("Response contained no text".to_string()))
    }
}

/// Pull the first candidate's text out of a response
fn extract_text(data: GenerateContentResponse) -> Option<String> {
    data.candidates?
        .into_iter()
        .next()?
        .content
        .parts?
        .into_iter()
        .find_map(|part| part.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_first_candidate() {
        let data = GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: CandidateContent {
                    parts: Some(vec![CandidatePart {
                        text: Some("analysis".to_string()),
                    }]),
                },
            }]),
        };
        assert_eq!(extract_text(data), Some("analysis".to_string()));
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let data = GenerateContentResponse {
            candidates: Some(vec![]),
        };
        assert_eq!(extract_text(data), None);

        let data = GenerateContentResponse { candidates: None };
        assert_eq!(extract_text(data), None);
    }

    #[test]
    fn test_generation_config_serializes_camel_case() {
        let config = GenerationConfig {
            temperature: 0.7,
            max_output_tokens: 2000,
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["maxOutputTokens"], 2000);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < f64::EPSILON);
    }
}
