//! Turns user selections into an instruction for the text backend plus the
//! schema its reply must follow.

use std::collections::HashMap;

use crate::options::{ConceptOptions, DesignOptions};
use crate::report::ReportKind;
use crate::schema::{architectural_brief_schema, design_report_schema, Schema};

/// Heading of the clause that pins user-supplied architectural features.
pub const FEATURE_CONSTRAINT_HEADER: &str =
    "The design MUST incorporate these architectural features and dimensions:";

const DEFAULT_STYLE_GUIDE: &str = "\
Focus on a clean, contemporary, and functional design.
- Colors: a neutral palette of whites, greys, blacks and earthy tones with occasional pops of color.
- Furniture & Decor: clean lines and simple forms, natural materials like wood, metal and glass, no excessive ornamentation.
- Principles: simplicity, functionality and uncluttered, open spaces.";

const DEFAULT_EMOTION_GUIDE: &str = "\
Interpret the emotion through light, proportion, material and movement.
- Translate the feeling into spatial sequences, thresholds and views.
- Favor natural materials and daylight that reinforce the emotion throughout the day.";

lazy_static::lazy_static! {
    static ref STYLE_GUIDES: HashMap<&'static str, &'static str> = {
        let mut guides = HashMap::new();
        guides.insert("modern", DEFAULT_STYLE_GUIDE);
        guides.insert("indian", "\
Incorporate vibrant, rich Indian design elements.
- Colors: a palette drawn from Indian spices (turmeric yellow, saffron orange, cardamom green, chili red) or royal palaces (royal blue, emerald, ruby with gold accents).
- Furniture & Decor: hand-carved Sheesham wood with floral motifs, a jhoola (swing), low baithak seating, brass lamps, copper urlis and jaali latticework screens.
- Textiles & Patterns: paisley, ikat and block prints for cushions and throws, handwoven dhurries, silk and brocade.");
        guides.insert("western", "\
Incorporate clean, distinct Western design elements.
- Colors: Scandinavian neutrals (muted greys, beige, light wood), modern farmhouse (white, charcoal, warm neutrals) or rustic lodge (earthy browns, deep greens, stone grey).
- Furniture & Decor: Mid-Century Modern pieces with tapered legs, leather armchairs and cowhide rugs, or coastal linen sofas and weathered wood; exposed brick and metal frames.
- Textures & Materials: distressed leather, natural stone, reclaimed wood and wrought iron layered with wool plaid and chunky knit throws.");
        guides
    };

    static ref EMOTION_GUIDES: HashMap<&'static str, &'static str> = {
        let mut guides = HashMap::new();
        guides.insert("serenity", "\
- Low, horizontal massing that sits quietly in the landscape.
- Filtered, indirect daylight; courtyards and water features that slow movement.
- A restrained palette of stone, lime plaster and timber.");
        guides.insert("joy", "\
- Playful volumes, generous openings and moments of surprise along circulation.
- Bright, warm daylight and saturated accent colors.
- Spaces that invite gathering, such as verandas, terraces and open kitchens.");
        guides.insert("security", "\
- Solid, grounded massing with a clear, protected core.
- Controlled openings, layered thresholds and a sheltered arrival sequence.
- Robust, tactile materials such as rammed earth, brick and heavy timber.");
        guides.insert("inspiration", "\
- Vertical volumes, double-height spaces and framed long views.
- Dynamic light that changes across the day, such as clerestories and skylights.
- Expressive structure left visible.");
        guides.insert("nostalgia", "\
- Reinterpret vernacular forms, roofs and craft traditions of the region.
- Reclaimed and patinated materials, warm low light.
- Intimate rooms arranged around a familiar shared heart.");
        guides.insert("connection", "\
- Porous plans with shared courtyards and visual links between rooms.
- Blurred boundaries between inside and outside.
- Communal spaces placed at the center, private rooms at the edge.");
        guides
    };
}

/// Instruction text plus the schema the reply must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub instruction: String,
    pub schema: Schema,
}

/// Looks up the style fragment, falling back to the modern guide for keys
/// the table does not know.
pub fn style_guide(style: &str) -> &'static str {
    STYLE_GUIDES
        .get(style.trim().to_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_STYLE_GUIDE)
}

pub fn emotion_guide(emotion: &str) -> &'static str {
    EMOTION_GUIDES
        .get(emotion.trim().to_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_EMOTION_GUIDE)
}

pub fn build_design_request(options: &DesignOptions) -> ReportRequest {
    let personality = options.personality.as_str();
    let mood = options.mood.as_str();
    let room = options.room.as_str();
    let style = options.style.as_str();
    let budget = options.budget.as_str();

    let features = options.features.trim();
    let features_clause = if features.is_empty() {
        String::new()
    } else {
        format!(
            "\n{}\n- {}\nThese features are hard constraints and must be central to every recommendation, especially the 'visual_prompt'.\n",
            FEATURE_CONSTRAINT_HEADER, features
        )
    };

    let instruction = format!(
        r#"You are "EmotiSpace: Professional Interior Design & Wellbeing Engine". Generate a full, actionable room design analysis from the user input below. The output must be a machine-readable JSON payload that strictly follows the provided schema.

User Input:
- personality: {personality}
- emotional_goal: {mood}
- room_type: {room}
- design_style: {style}
- budget_level: {budget}
{features_clause}
Style Guidelines:
{style_guide}

JSON Output Instructions:
Produce a JSON object with exactly the keys described in the schema. Every section must reflect the user's input and the {style} design style. All furniture, material and decor suggestions must suit the budget_level ({budget}).

1. insight_report: an executive-style report.
   - headline: a compelling title summarizing the design strategy and naming the style.
   - analysis: 3-4 personalized strategies reflecting a {personality} personality, the {mood} emotional goal and {style} principles, mindful of the budget.
2. emotional_story: a short, vivid, sensory paragraph describing the atmosphere, textures, light and emotional effect of the {room}.
3. visual_prompt: a single cinematic, technically rich paragraph for a photorealistic, high-resolution interior photograph of the {room} (16:9 aspect ratio). Specify materials, lighting, key furniture, decor, color palette and camera angle. It must follow the {style} aesthetic and stay realistic for the {budget} budget.
4. implementation_steps: a practical checklist of 3-6 steps. For each step give the task, an effort level ('Low', 'Medium' or 'High') and an estimated time in days.
5. estimated_budget: a friendly cost range for the whole project (e.g. '$1,500 - $3,000') that is realistic for the {budget} budget.
"#,
        style_guide = style_guide(style),
    );

    ReportRequest {
        kind: ReportKind::DesignIdeas,
        instruction,
        schema: design_report_schema(),
    }
}

pub fn build_concept_request(options: &ConceptOptions) -> ReportRequest {
    let emotion = options.emotion.trim();
    let location = options.location.trim();

    let instruction = format!(
        r#"You are "EmotiSpace: Emotion-Driven Resilient Architecture Engine". Produce an architectural concept brief for a home that embodies a core emotion while withstanding the natural hazards of its location. The output must be a machine-readable JSON payload that strictly follows the provided schema.

User Input:
- core_emotion: {emotion}
- location: {location}

Emotion Guidelines ({emotion}):
{emotion_guide}

JSON Output Instructions:
1. conceptual_headline: an evocative name for the concept that references {emotion}.
2. emotion_deconstruction: 3-5 concrete design principles derived from {emotion}.
3. regional_hazards: the climate and natural hazards most relevant to {location} (e.g. floods, cyclones, earthquakes, extreme heat).
4. design_synthesis_statement: one statement explaining how the design reconciles {emotion} with resilience in {location}.
5. key_features: 3-5 features. For each give feature_name, emotional_rationale, resilience_rationale and dual_purpose_synthesis.
6. visual_prompt: a single cinematic, photorealistic paragraph describing the building exterior in its {location} setting (16:9 aspect ratio), naming materials, massing, landscape, light and weather.
7. floor_plan_prompt: a prompt for a clean, top-down 2D conceptual floor plan (1:1 aspect ratio) on a white background with labeled rooms, showing the key features.
"#,
        emotion_guide = emotion_guide(emotion),
    );

    ReportRequest {
        kind: ReportKind::ArchitecturalConcept,
        instruction,
        schema: architectural_brief_schema(),
    }
}
