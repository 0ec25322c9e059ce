//! Direct REST transport for the Gemini API.
//!
//! Calls the provider's `generateContent` endpoint with the configured
//! key and a best-effort structured-output request (JSON mime type plus
//! a response schema for the requested shape).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use vigil_core::error::{Result, VigilError};
use vigil_core::transport::{GenerationRequest, GenerationTransport};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Transport that talks to the Gemini HTTP API directly.
#[derive(Clone)]
pub struct GeminiTransport {
    client: Client,
    api_key: String,
}

impl GeminiTransport {
    /// Creates a transport with the provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl GenerationTransport for GeminiTransport {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = request.model,
            api_key = self.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: request.shape.schema_descriptor(),
            },
        };

        tracing::debug!(model = %request.model, "sending generateContent request");

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                VigilError::generation_failed(format!("Gemini API request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            VigilError::generation_failed(format!("failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            VigilError::generation_failed("Gemini API returned no text in the response candidates")
        })
}

fn map_http_error(status: StatusCode, body: String) -> VigilError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or(body);

    VigilError::generation_failed(format!("Gemini API returned {status}: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::transport::ResponseShape;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".into(),
                parts: vec![Part {
                    text: "wake up".into(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: Some(1.1),
                response_mime_type: "application/json".into(),
                response_schema: ResponseShape::Turn.schema_descriptor(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "wake up");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            json["generationConfig"]["responseSchema"]["required"][0],
            "diaryEntry"
        );
    }

    #[test]
    fn test_temperature_is_omitted_when_unset() {
        let config = GenerationConfig {
            temperature: None,
            response_mime_type: "application/json".into(),
            response_schema: ResponseShape::Hero.schema_descriptor(),
        };
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_extract_text_rejects_empty_candidates() {
        let response = GenerateContentResponse { candidates: None };
        assert!(extract_text_response(response).unwrap_err().is_generation_failed());

        let response = GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(ContentResponse {
                    parts: vec![PartResponse {
                        text: Some("   ".into()),
                    }],
                }),
            }]),
        };
        assert!(extract_text_response(response).unwrap_err().is_generation_failed());
    }

    #[test]
    fn test_map_http_error_prefers_provider_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let err = map_http_error(StatusCode::BAD_REQUEST, body.to_string());
        assert!(err.to_string().contains("INVALID_ARGUMENT: API key not valid"));

        let err = map_http_error(StatusCode::BAD_GATEWAY, "<html>".to_string());
        assert!(err.to_string().contains("502"));
    }
}
