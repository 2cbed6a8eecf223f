use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::GeminiConfig;
use crate::constants::IMAGE_MIME_TYPE;
use crate::error::{BackendError, ConfigError, GenerationFailure};
use crate::report::{AspectRatio, GeneratedImage};

// Structures matching the :predict endpoint
#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: AspectRatio,
    output_options: OutputOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: &'static str,
}

#[derive(Deserialize, Debug)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

/// Single-image generation for one prompt and aspect ratio.
#[derive(Debug, Clone)]
pub struct VisualizationClient {
    http: Client,
    config: GeminiConfig,
}

impl VisualizationClient {
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

    /// The prompt actually sent, with the configured suffix appended.
    pub fn full_prompt(&self, prompt: &str) -> String {
        match self.config.image_suffix.as_deref() {
            Some(suffix) => format!("{}, {}", prompt.trim_end(), suffix),
            None => prompt.to_string(),
        }
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.image_model))]
    pub async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage, GenerationFailure> {
        self.request_image(prompt, aspect_ratio).await.map_err(|cause| {
            error!(error = %cause, "Image generation failed");
            GenerationFailure::Image { cause }
        })
    }

    async fn request_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage, BackendError> {
        let endpoint = self
            .config
            .model_endpoint(&self.config.image_model, "predict");
        let prompt = self.full_prompt(prompt);

        debug!(%prompt, "Constructed image prompt");

        let payload = PredictRequest {
            instances: vec![PredictInstance { prompt }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio,
                output_options: OutputOptions {
                    mime_type: IMAGE_MIME_TYPE,
                },
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

        let parsed: PredictResponse = serde_json::from_str(&body)?;
        // Filtered predictions come back without bytes.
        let prediction = parsed
            .predictions
            .into_iter()
            .find(|prediction| prediction.bytes_base64_encoded.is_some())
            .ok_or(BackendError::EmptyResponse)?;
        let encoded = prediction.bytes_base64_encoded.unwrap_or_default();
        let bytes = BASE64.decode(encoded.trim().as_bytes())?;
        if bytes.is_empty() {
            return Err(BackendError::EmptyResponse);
        }

        debug!(size = bytes.len(), "Received image");

        Ok(GeneratedImage {
            mime_type: prediction
                .mime_type
                .unwrap_or_else(|| IMAGE_MIME_TYPE.to_string()),
            aspect_ratio,
            bytes,
        })
    }
}
