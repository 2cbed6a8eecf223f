use thiserror::Error;

use crate::orchestrator::Stage;
use crate::report::ReportKind;

/// Raised at startup when the backend cannot be configured.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API_KEY environment variable not set")]
    MissingApiKey,
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

/// Options rejected at an outer surface before a run starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("an emotion is required")]
    MissingEmotion,
    #[error("a location is required")]
    MissingLocation,
    #[error("invalid Big Five scores '{0}': expected five comma-separated values from 0 to 100")]
    InvalidTraits(String),
}

/// What went wrong while talking to a generation backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("backend returned no content")]
    EmptyResponse,
    #[error("response was not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("response did not match the requested schema: {0}")]
    SchemaMismatch(String),
    #[error("image payload could not be decoded: {0}")]
    InvalidImage(#[from] base64::DecodeError),
}

/// A failed remote generation call. The display text is what users see; the
/// cause stays available through `source()` for logs.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("{}", .kind.failure_message())]
    Text {
        kind: ReportKind,
        #[source]
        cause: BackendError,
    },
    #[error("Failed to generate image.")]
    Image {
        #[source]
        cause: BackendError,
    },
}

impl GenerationFailure {
    pub fn cause(&self) -> &BackendError {
        match self {
            GenerationFailure::Text { cause, .. } | GenerationFailure::Image { cause } => cause,
        }
    }
}

/// The first failure of a run together with the stage it ended in.
#[derive(Debug, Error)]
#[error("{failure}")]
pub struct OrchestrationFailure {
    pub stage: Stage,
    #[source]
    pub failure: GenerationFailure,
}

impl OrchestrationFailure {
    /// Message handed verbatim to the UI.
    pub fn user_message(&self) -> String {
        self.failure.to_string()
    }
}
