//! Gemini `generateContent` client

use super::{VisionError, VisionModel};
use crate::config::AiConfig;
use aquafit_shared::ImageAsset;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Longest upstream error text kept in a [`VisionError::Status`]
const MAX_ERROR_CHARS: usize = 200;

/// Header carrying the API key, keeping it out of request URLs
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    candidate_count: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Hosted Gemini model reached over HTTPS
pub struct GeminiVisionClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: SecretString,
    temperature: f32,
}

impl GeminiVisionClient {
    /// Build a client with the configured timeout applied to every request
    pub fn new(config: &AiConfig, api_key: SecretString) -> Result<Self, VisionError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| VisionError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn build_request<'a>(&self, instruction: &'a str, image: &'a ImageAsset) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text { text: instruction },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type(),
                            data: image.data_base64(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                candidate_count: 1,
                temperature: self.temperature,
            },
        }
    }

    /// Concatenated text parts of the first candidate
    fn extract_text(response: GenerateContentResponse) -> Result<String, VisionError> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            Err(VisionError::EmptyCompletion)
        } else {
            Ok(text)
        }
    }

    fn map_api_error(status: u16, response_text: &str) -> VisionError {
        let message = serde_json::from_str::<GenerateContentResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        VisionError::Status {
            status,
            message: message.chars().take(MAX_ERROR_CHARS).collect(),
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> VisionError {
    if err.is_timeout() {
        VisionError::Timeout
    } else {
        VisionError::Transport(err.without_url().to_string())
    }
}

#[async_trait]
impl VisionModel for GeminiVisionClient {
    async fn complete(&self, instruction: &str, image: &ImageAsset) -> Result<String, VisionError> {
        let body = self.build_request(instruction, image);

        debug!(model = %self.model, image_bytes = image.size_bytes(), "Sending request to Gemini API");

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.expose_secret().as_str())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let response_text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| VisionError::InvalidResponse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(VisionError::InvalidResponse(error.message));
        }

        Self::extract_text(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
