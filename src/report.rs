use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

/// Which structured document a text generation call produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    DesignIdeas,
    ArchitecturalConcept,
}

impl ReportKind {
    pub fn failure_message(&self) -> &'static str {
        match self {
            ReportKind::DesignIdeas => "Failed to generate design ideas. Please try again later.",
            ReportKind::ArchitecturalConcept => {
                "Failed to generate architectural concept. Please try again later."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub headline: String,
    pub analysis: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    pub const LABELS: [&'static str; 3] = ["Low", "Medium", "High"];
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Effort::Low => "Low",
            Effort::Medium => "Medium",
            Effort::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationStep {
    pub step: String,
    pub effort: Effort,
    pub estimated_days: f64,
}

/// Interior design report returned by the text backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    pub insight_report: InsightReport,
    pub emotional_story: String,
    pub implementation_steps: Vec<ImplementationStep>,
    /// Prompt for the room render.
    pub visual_prompt: String,
    pub estimated_budget: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFeature {
    pub feature_name: String,
    pub emotional_rationale: String,
    pub resilience_rationale: String,
    pub dual_purpose_synthesis: String,
}

/// Architectural concept brief returned by the text backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitecturalBrief {
    pub conceptual_headline: String,
    pub emotion_deconstruction: Vec<String>,
    pub regional_hazards: Vec<String>,
    pub design_synthesis_statement: String,
    pub key_features: Vec<KeyFeature>,
    /// Prompt for the exterior render.
    pub visual_prompt: String,
    /// Prompt for the top-down floor plan.
    pub floor_plan_prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Square => "1:1",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded image owned by the result that references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub aspect_ratio: AspectRatio,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    /// Embeddable `data:` URI for `<img src>`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }
}

impl Serialize for GeneratedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GeneratedImage", 3)?;
        state.serialize_field("mime_type", &self.mime_type)?;
        state.serialize_field("aspect_ratio", &self.aspect_ratio)?;
        state.serialize_field("data_uri", &self.data_uri())?;
        state.end()
    }
}
