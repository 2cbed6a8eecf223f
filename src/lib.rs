pub mod config;
pub mod constants;
pub mod error;
pub mod image_generation;
pub mod llm_interaction;
pub mod options;
pub mod orchestrator;
pub mod prompt;
pub mod render;
pub mod report;
pub mod schema;
pub mod web_server;

pub use config::GeminiConfig;
pub use error::{BackendError, ConfigError, GenerationFailure, OptionsError, OrchestrationFailure};
pub use image_generation::VisualizationClient;
pub use llm_interaction::StructuredGenerationClient;
pub use options::{BigFiveTraits, Budget, ConceptOptions, DesignOptions, Mood, Personality, Room, Style};
pub use orchestrator::{Orchestrator, RunRequest, RunResult, RunStatus, Stage};
pub use report::{ArchitecturalBrief, AspectRatio, DesignReport, GeneratedImage};
