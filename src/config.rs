use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use crate::constants::*;
use crate::error::ConfigError;

/// Connection settings shared by both generation clients.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: String,
    pub text_model: String,
    pub image_model: String,
    /// Appended to every image prompt when set.
    pub image_suffix: Option<String>,
    pub timeout: Duration,
}

// Keeps the key out of logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("image_suffix", &self.image_suffix)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            image_suffix: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = get(API_KEY_VAR)
            .or_else(|| get(GEMINI_API_KEY_VAR))
            .ok_or(ConfigError::MissingApiKey)?;
        let mut config = Self::new(api_key)?;

        if let Some(base) = get(API_BASE_VAR) {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(model) = get(TEXT_MODEL_VAR) {
            config.text_model = model;
        }
        if let Some(model) = get(IMAGE_MODEL_VAR) {
            config.image_model = model;
        }
        config.image_suffix = get(IMAGE_SUFFIX_VAR);
        if let Some(raw) = get(HTTP_TIMEOUT_VAR) {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    var: HTTP_TIMEOUT_VAR,
                    reason: e.to_string(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_image_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.image_suffix = Some(suffix.into());
        self
    }

    pub fn model_endpoint(&self, model: &str, method: &str) -> String {
        let model = model.trim().trim_start_matches("models/");
        format!("{}/models/{}:{}", self.api_base, model, method)
    }

    pub(crate) fn http_client(&self) -> Client {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .unwrap_or_else(|e| {
                // Only fails when the TLS backend cannot initialise.
                warn!(error = %e, timeout = ?self.timeout, "HTTP client setup failed, falling back to defaults without a request timeout");
                Client::new()
            })
    }
}
