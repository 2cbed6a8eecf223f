use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::config::GeminiConfig;
use crate::error::{BackendError, ConfigError, GenerationFailure};
use crate::prompt::ReportRequest;
use crate::schema::{compiled_schema, Schema};

// Structures matching the generateContent endpoint
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str, // Forces a JSON document
    response_schema: &'a Schema,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    // Usage metadata and safety ratings are ignored
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

/// Schema-constrained text generation.
#[derive(Debug, Clone)]
pub struct StructuredGenerationClient {
    http: Client,
    config: GeminiConfig,
}

impl StructuredGenerationClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: config.http_client(),
            config,
        }
    }

    /// Fails with [`ConfigError`] before any request when no key is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(GeminiConfig::from_env()?))
    }

    /// Sends the instruction, then parses and validates the reply against the
    /// request's schema before deserializing it into `T`.
    #[instrument(skip(self, request), fields(kind = ?request.kind, model = %self.config.text_model))]
    pub async fn generate<T: DeserializeOwned>(
        &self,
        request: &ReportRequest,
    ) -> Result<T, GenerationFailure> {
        let result = self
            .generate_value(request)
            .await
            .and_then(|value| {
                serde_json::from_value(value)
                    .map_err(|e| BackendError::SchemaMismatch(e.to_string()))
            });

        result.map_err(|cause| {
            error!(error = %cause, "Structured generation failed");
            GenerationFailure::Text {
                kind: request.kind,
                cause,
            }
        })
    }

    async fn generate_value(&self, request: &ReportRequest) -> Result<Value, BackendError> {
        let instruction = request.instruction.as_str();
        let endpoint = self
            .config
            .model_endpoint(&self.config.text_model, "generateContent");

        debug!(prompt = %instruction, "Constructed text generation prompt");

        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart { text: instruction }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.schema,
            },
        };

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| BackendError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&body)?;
        let text = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(BackendError::EmptyResponse);
        }

        debug!(response = %text, "Received structured response");

        let value: Value = serde_json::from_str(text.trim())?;
        compiled_schema(request.kind)
            .and_then(|schema| schema.validate(&value))
            .map_err(BackendError::SchemaMismatch)?;
        Ok(value)
    }
}
