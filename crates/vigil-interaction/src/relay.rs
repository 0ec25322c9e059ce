//! Relayed transport.
//!
//! Serializes the same logical request as a JSON body to a forwarding
//! relay, which attaches the key and proxies to the provider. The relay
//! is expected to answer `{ "text": string | null }`; any non-success
//! status or missing text is a transport failure, reported exactly like
//! a provider failure so callers cannot tell the hops apart.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use vigil_core::error::{Result, VigilError};
use vigil_core::transport::{GenerationRequest, GenerationTransport};

/// Default relay endpoint. The original deployment mounted the relay on
/// the serving origin at `/api/proxy`; a native process has no origin,
/// so a loopback default is used instead.
pub const DEFAULT_RELAY_ENDPOINT: &str = "http://127.0.0.1:3000/api/proxy";

/// Transport that forwards requests through a relay.
#[derive(Clone)]
pub struct RelayTransport {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl RelayTransport {
    /// Creates a transport against the default relay endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            endpoint: DEFAULT_RELAY_ENDPOINT.to_string(),
        }
    }

    /// Overrides the relay endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl GenerationTransport for RelayTransport {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let schema = request.shape.schema_descriptor();
        let body = RelayRequest {
            model: request.model.clone(),
            contents: request.prompt,
            config: RelayGenerationConfig {
                temperature: request.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: schema.clone(),
            },
            schema,
            api_key: self.api_key.clone(),
        };

        tracing::debug!(endpoint = %self.endpoint, model = %request.model, "forwarding request to relay");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| VigilError::generation_failed(format!("relay request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read relay error body".to_string());
            return Err(VigilError::generation_failed(format!(
                "relay returned {status}: {body_text}"
            )));
        }

        let parsed: RelayResponse = response.json().await.map_err(|err| {
            VigilError::generation_failed(format!("malformed relay response: {err}"))
        })?;

        match parsed.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(VigilError::generation_failed(
                "relay response carried no text",
            )),
        }
    }
}

#[derive(Serialize)]
struct RelayRequest {
    model: String,
    contents: String,
    config: RelayGenerationConfig,
    schema: Value,
    #[serde(rename = "apiKey")]
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct RelayResponse {
    text: Option<String>,
}
