//! Sequences one run: structured report first, then the image(s) its prompts
//! describe. A run ends in exactly one of [`RunResult`] or
//! [`OrchestrationFailure`]; nothing partial escapes.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::GeminiConfig;
use crate::error::{ConfigError, GenerationFailure, OrchestrationFailure};
use crate::image_generation::VisualizationClient;
use crate::llm_interaction::StructuredGenerationClient;
use crate::options::{ConceptOptions, DesignOptions};
use crate::prompt::{build_concept_request, build_design_request};
use crate::report::{ArchitecturalBrief, AspectRatio, DesignReport, GeneratedImage};

/// Immutable input of one run. The variant selects the mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RunRequest {
    Interior(DesignOptions),
    Architecture(ConceptOptions),
}

impl RunRequest {
    pub fn mode(&self) -> Mode {
        match self {
            RunRequest::Interior(_) => Mode::Interior,
            RunRequest::Architecture(_) => Mode::Architecture,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Interior,
    Architecture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Building,
    ReportPending,
    ImagePending,
    Complete,
    Failed,
}

/// Advisory progress update for UIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStatus {
    pub run_id: Uuid,
    pub mode: Mode,
    pub stage: Stage,
    pub label: String,
}

impl RunStatus {
    /// Whether a listener following `run` (or every run, for `None`) wants
    /// this update.
    pub fn belongs_to(&self, run: Option<Uuid>) -> bool {
        run.map_or(true, |id| id == self.run_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InteriorResult {
    pub report: DesignReport,
    pub image: GeneratedImage,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchitectureResult {
    pub brief: ArchitecturalBrief,
    pub exterior: GeneratedImage,
    pub floor_plan: GeneratedImage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RunResult {
    Interior(InteriorResult),
    Architecture(ArchitectureResult),
}

const STATUS_CHANNEL_CAPACITY: usize = 64;

pub struct Orchestrator {
    text: StructuredGenerationClient,
    images: VisualizationClient,
    status_tx: broadcast::Sender<RunStatus>,
}

impl Orchestrator {
    pub fn new(text: StructuredGenerationClient, images: VisualizationClient) -> Self {
        let (status_tx, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self {
            text,
            images,
            status_tx,
        }
    }

    pub fn from_config(config: GeminiConfig) -> Self {
        Self::new(
            StructuredGenerationClient::new(config.clone()),
            VisualizationClient::new(config),
        )
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::from_config(GeminiConfig::from_env()?))
    }

    /// Status updates of every run started after subscribing.
    pub fn subscribe(&self) -> broadcast::Receiver<RunStatus> {
        self.status_tx.subscribe()
    }

    pub async fn run(&self, request: RunRequest) -> Result<RunResult, OrchestrationFailure> {
        self.run_as(Uuid::new_v4(), request).await
    }

    /// Like [`Orchestrator::run`], with status updates tagged `run_id` so a
    /// caller that picked the id can follow only its own run.
    #[instrument(skip(self, request), fields(%run_id, mode = ?request.mode()))]
    pub async fn run_as(
        &self,
        run_id: Uuid,
        request: RunRequest,
    ) -> Result<RunResult, OrchestrationFailure> {
        let mut run = Run {
            id: run_id,
            mode: request.mode(),
            stage: Stage::Building,
            status_tx: &self.status_tx,
        };
        run.enter(Stage::Building, "Preparing your request...");

        let outcome = match &request {
            RunRequest::Interior(options) => self
                .run_interior(&mut run, options)
                .await
                .map(RunResult::Interior),
            RunRequest::Architecture(options) => self
                .run_architecture(&mut run, options)
                .await
                .map(RunResult::Architecture),
        };

        match outcome {
            Ok(result) => {
                run.enter(Stage::Complete, "Done");
                info!(run_id = %run.id, "Run complete");
                Ok(result)
            }
            Err(failure) => {
                let failure = OrchestrationFailure {
                    stage: run.stage,
                    failure,
                };
                error!(run_id = %run.id, stage = ?failure.stage, cause = %failure.failure.cause(), "Run failed");
                run.enter(Stage::Failed, &failure.user_message());
                Err(failure)
            }
        }
    }

    async fn run_interior(
        &self,
        run: &mut Run<'_>,
        options: &DesignOptions,
    ) -> Result<InteriorResult, GenerationFailure> {
        let request = build_design_request(options);

        run.enter(Stage::ReportPending, "Analyzing your style...");
        let report: DesignReport = self.text.generate(&request).await?;

        run.enter(Stage::ImagePending, "Rendering your visualization...");
        let image = self
            .images
            .generate(&report.visual_prompt, AspectRatio::Widescreen)
            .await?;

        Ok(InteriorResult { report, image })
    }

    async fn run_architecture(
        &self,
        run: &mut Run<'_>,
        options: &ConceptOptions,
    ) -> Result<ArchitectureResult, GenerationFailure> {
        let request = build_concept_request(options);

        run.enter(Stage::ReportPending, "Deconstructing your emotion...");
        let brief: ArchitecturalBrief = self.text.generate(&request).await?;

        run.enter(Stage::ImagePending, "Rendering your visualization...");
        let exterior = self
            .images
            .generate(&brief.visual_prompt, AspectRatio::Widescreen)
            .await?;

        run.enter(Stage::ImagePending, "Drafting your floor plan...");
        let floor_plan = self
            .images
            .generate(&brief.floor_plan_prompt, AspectRatio::Square)
            .await?;

        Ok(ArchitectureResult {
            brief,
            exterior,
            floor_plan,
        })
    }
}

// Per-run bookkeeping; lives only for the duration of `run`.
struct Run<'a> {
    id: Uuid,
    mode: Mode,
    stage: Stage,
    status_tx: &'a broadcast::Sender<RunStatus>,
}

impl Run<'_> {
    fn enter(&mut self, stage: Stage, label: &str) {
        self.stage = stage;
        info!(run_id = %self.id, ?stage, label, "Run stage");
        // No subscribers is fine.
        let _ = self.status_tx.send(RunStatus {
            run_id: self.id,
            mode: self.mode,
            stage,
            label: label.to_string(),
        });
    }
}
