// Plain-text rendering of run results for the terminal.

use std::fmt;

use crate::orchestrator::{ArchitectureResult, InteriorResult, RunResult};
use crate::report::{GeneratedImage, ImplementationStep};

pub fn render_result(result: &RunResult) -> String {
    match result {
        RunResult::Interior(result) => result.to_string(),
        RunResult::Architecture(result) => result.to_string(),
    }
}

struct Days<'a>(&'a ImplementationStep);

impl fmt::Display for Days<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.0.estimated_days;
        let unit = if days == 1.0 { "day" } else { "days" };
        write!(f, "~{} {}", days, unit)
    }
}

struct ImageLine<'a>(&'a GeneratedImage);

impl fmt::Display for ImageLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let image = self.0;
        write!(
            f,
            "{} ({} bytes, {})",
            image.mime_type,
            image.bytes.len(),
            image.aspect_ratio
        )
    }
}

fn bullets(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    for item in items {
        writeln!(f, "  - {}", item)?;
    }
    Ok(())
}

impl fmt::Display for InteriorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = &self.report;

        writeln!(f, "Your EmotiSpace Design Report")?;
        writeln!(f, "=============================\n")?;
        writeln!(f, "Insight Report: {}", report.insight_report.headline)?;
        bullets(f, &report.insight_report.analysis)?;
        writeln!(f, "\nEstimated Budget: {}", report.estimated_budget)?;
        writeln!(f, "\nEmotional Design Story:\n  {}", report.emotional_story)?;
        writeln!(f, "\nImplementation Checklist:")?;
        for (index, step) in report.implementation_steps.iter().enumerate() {
            writeln!(
                f,
                "  {}. {} [{} Effort, {}]",
                index + 1,
                step.step,
                step.effort,
                Days(step)
            )?;
        }
        writeln!(f, "\nImage: {}", ImageLine(&self.image))
    }
}

impl fmt::Display for ArchitectureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let brief = &self.brief;

        writeln!(f, "Architectural Concept")?;
        writeln!(f, "=====================\n")?;
        writeln!(f, "{}\n", brief.conceptual_headline)?;
        writeln!(f, "Emotion Deconstruction:")?;
        bullets(f, &brief.emotion_deconstruction)?;
        writeln!(f, "\nRegional Hazards:")?;
        bullets(f, &brief.regional_hazards)?;
        writeln!(f, "\nDesign Synthesis:\n  {}", brief.design_synthesis_statement)?;
        writeln!(f, "\nKey Features & Rationale:")?;
        for feature in &brief.key_features {
            writeln!(f, "  {}", feature.feature_name)?;
            writeln!(f, "    Emotional Rationale: {}", feature.emotional_rationale)?;
            writeln!(f, "    Resilience Rationale: {}", feature.resilience_rationale)?;
            writeln!(f, "    Synthesis: {}", feature.dual_purpose_synthesis)?;
        }
        writeln!(f, "\nExterior: {}", ImageLine(&self.exterior))?;
        writeln!(f, "Floor Plan: {}", ImageLine(&self.floor_plan))
    }
}
