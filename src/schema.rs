//! Declarative response schemas.
//!
//! A [`Schema`] serializes to the `responseSchema` shape the text backend
//! accepts, and the same descriptor validates the parsed reply locally before
//! it is turned into a typed report.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::report::{Effort, ReportKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
}

impl SchemaType {
    fn json_schema_name(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Number => "number",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
}

impl Schema {
    fn of(kind: SchemaType) -> Self {
        Self {
            kind,
            description: None,
            allowed: Vec::new(),
            properties: IndexMap::new(),
            required: Vec::new(),
            items: None,
            min_items: None,
            max_items: None,
        }
    }

    pub fn object() -> Self {
        Self::of(SchemaType::Object)
    }

    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    pub fn number() -> Self {
        Self::of(SchemaType::Number)
    }

    pub fn enumeration(allowed: &[&str]) -> Self {
        let mut schema = Self::of(SchemaType::String);
        schema.allowed = allowed.iter().map(|value| value.to_string()).collect();
        schema
    }

    pub fn array(items: Schema) -> Self {
        let mut schema = Self::of(SchemaType::Array);
        schema.items = Some(Box::new(items));
        schema
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn items_between(mut self, min: u64, max: u64) -> Self {
        self.min_items = Some(min);
        self.max_items = Some(max);
        self
    }

    /// Adds a required property.
    pub fn property(mut self, name: &str, schema: Schema) -> Self {
        self.properties.insert(name.to_string(), schema);
        self.required.push(name.to_string());
        self
    }

    /// Standard JSON Schema rendition of this descriptor.
    pub fn to_json_schema(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), json!(self.kind.json_schema_name()));
        if !self.allowed.is_empty() {
            out.insert("enum".into(), json!(self.allowed));
        }
        if !self.properties.is_empty() {
            let properties: Map<String, Value> = self
                .properties
                .iter()
                .map(|(name, schema)| (name.clone(), schema.to_json_schema()))
                .collect();
            out.insert("properties".into(), Value::Object(properties));
        }
        if !self.required.is_empty() {
            out.insert("required".into(), json!(self.required));
        }
        if let Some(items) = &self.items {
            out.insert("items".into(), items.to_json_schema());
        }
        if let Some(min) = self.min_items {
            out.insert("minItems".into(), json!(min));
        }
        if let Some(max) = self.max_items {
            out.insert("maxItems".into(), json!(max));
        }
        Value::Object(out)
    }

    /// Compiles the JSON Schema rendition for validating replies.
    pub fn compile(&self) -> Result<CompiledSchema, String> {
        jsonschema::validator_for(&self.to_json_schema())
            .map(|validator| CompiledSchema { validator })
            .map_err(|e| format!("schema failed to compile: {}", e))
    }
}

/// A [`Schema`] ready to check parsed replies.
pub struct CompiledSchema {
    validator: jsonschema::Validator,
}

impl CompiledSchema {
    /// Checks `value` against the schema. The error lists every violation
    /// found.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(value)
            .map(|e| format!("{}", e))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("; "))
        }
    }
}

// Compiled on first use, shared by every run afterwards.
lazy_static! {
    static ref DESIGN_REPORT: Result<CompiledSchema, String> = design_report_schema().compile();
    static ref ARCHITECTURAL_BRIEF: Result<CompiledSchema, String> =
        architectural_brief_schema().compile();
}

/// The compiled schema replies of `kind` are validated against.
pub fn compiled_schema(kind: ReportKind) -> Result<&'static CompiledSchema, String> {
    let compiled = match kind {
        ReportKind::DesignIdeas => &*DESIGN_REPORT,
        ReportKind::ArchitecturalConcept => &*ARCHITECTURAL_BRIEF,
    };
    compiled.as_ref().map_err(Clone::clone)
}

pub fn design_report_schema() -> Schema {
    let insight_report = Schema::object()
        .property(
            "headline",
            Schema::string()
                .describe("A concise, persuasive headline for the design insight report."),
        )
        .property(
            "analysis",
            Schema::array(Schema::string()).describe("3-4 personalized design strategies."),
        );

    let step = Schema::object()
        .property(
            "step",
            Schema::string().describe("A single, actionable implementation step."),
        )
        .property(
            "effort",
            Schema::enumeration(&Effort::LABELS).describe("Estimated effort: Low, Medium, or High."),
        )
        .property(
            "estimated_days",
            Schema::number().describe("Estimated time in days to complete the step."),
        );

    Schema::object()
        .property("insight_report", insight_report)
        .property(
            "emotional_story",
            Schema::string().describe(
                "A short, sensory paragraph describing the atmosphere, textures, light, and emotional effect of the proposed design.",
            ),
        )
        .property(
            "visual_prompt",
            Schema::string().describe(
                "A single, cinematic paragraph rich in visual detail for an AI image generator describing a photorealistic render of the room.",
            ),
        )
        .property(
            "implementation_steps",
            Schema::array(step)
                .items_between(3, 6)
                .describe("A checklist of 3-6 actionable steps for the user."),
        )
        .property(
            "estimated_budget",
            Schema::string().describe(
                "A friendly string describing the estimated budget range, e.g. '$1,500 - $3,000'.",
            ),
        )
}

pub fn architectural_brief_schema() -> Schema {
    let feature = Schema::object()
        .property(
            "feature_name",
            Schema::string().describe("Short name of the architectural feature."),
        )
        .property(
            "emotional_rationale",
            Schema::string().describe("How the feature evokes the core emotion."),
        )
        .property(
            "resilience_rationale",
            Schema::string().describe("How the feature mitigates the regional hazards."),
        )
        .property(
            "dual_purpose_synthesis",
            Schema::string().describe("How the emotional and resilience roles reinforce each other."),
        );

    Schema::object()
        .property(
            "conceptual_headline",
            Schema::string().describe("An evocative headline naming the architectural concept."),
        )
        .property(
            "emotion_deconstruction",
            Schema::array(Schema::string())
                .describe("Design principles derived from the core emotion."),
        )
        .property(
            "regional_hazards",
            Schema::array(Schema::string())
                .describe("Climate and natural hazards relevant to the location."),
        )
        .property(
            "design_synthesis_statement",
            Schema::string()
                .describe("One statement reconciling the emotional goal with regional resilience."),
        )
        .property(
            "key_features",
            Schema::array(feature)
                .items_between(3, 5)
                .describe("3-5 key features with their rationale."),
        )
        .property(
            "visual_prompt",
            Schema::string()
                .describe("A cinematic, photorealistic prompt for the building exterior."),
        )
        .property(
            "floor_plan_prompt",
            Schema::string().describe("A prompt for a clean top-down 2D conceptual floor plan."),
        )
}
