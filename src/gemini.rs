//! Thin client for the Gemini `generateContent` endpoint. The rest of the
//! system only sees `complete(system_prompt, transcript) -> text`, so any
//! other text-completion provider could sit behind the same call.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::types::{ConversationTurn, Role};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GENERATE_PATH: &str = "/v1beta/models/gemini-pro:generateContent";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to Gemini failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Gemini API error (status {status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid response format from Gemini API")]
    MalformedReply,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    safety_settings: Vec<SafetySetting>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Send the system prompt plus the transcript and return the model's
    /// reply text. Transcript order is preserved; `assistant` turns map to
    /// Gemini's `model` role. Not retried on failure.
    pub async fn complete(
        &self,
        system_prompt: &str,
        transcript: &[ConversationTurn],
    ) -> Result<String, ProviderError> {
        let mut contents = Vec::with_capacity(transcript.len() + 1);
        contents.push(Content {
            role: "user",
            parts: vec![Part {
                text: system_prompt.to_string(),
            }],
        });
        for turn in transcript {
            contents.push(Content {
                role: match turn.role {
                    Role::Assistant => "model",
                    Role::User => "user",
                },
                parts: vec![Part {
                    text: turn.content.clone(),
                }],
            });
        }

        let request = GenerateRequest {
            contents,
            safety_settings: vec![SafetySetting {
                category: "HARM_CATEGORY_HARASSMENT",
                threshold: "BLOCK_MEDIUM_AND_ABOVE",
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 1024,
            },
        };

        let url = format!("{}{}", self.base_url, GENERATE_PATH);
        debug!(%url, turns = transcript.len(), "calling Gemini generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            error!(%status, %body, "Gemini API request failed");
            return Err(ProviderError::Status { status, body });
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|_| ProviderError::MalformedReply)?;

        reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or(ProviderError::MalformedReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_is_camel_case() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: "hi".to_string(),
                }],
            }],
            safety_settings: vec![SafetySetting {
                category: "HARM_CATEGORY_HARASSMENT",
                threshold: "BLOCK_MEDIUM_AND_ABOVE",
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 1024,
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""safetySettings""#));
        assert!(json.contains(r#""generationConfig""#));
        assert!(json.contains(r#""maxOutputTokens":1024"#));
        assert!(json.contains(r#""topK":40"#));
    }

    #[test]
    fn test_reply_text_extraction_tolerates_missing_fields() {
        let reply: GenerateResponse = serde_json::from_str(r#"{"candidates":[{}]}"#).unwrap();
        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text);
        assert!(text.is_none());
    }
}
