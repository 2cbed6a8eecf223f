// Shared fixtures for tests that talk to mock generation backends.
#![allow(dead_code)]

use emotispace::GeminiConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Base64 of the eight-byte PNG signature.
pub const PNG_BASE64: &str = "iVBORw0KGgo=";
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub fn config_for(server: &MockServer) -> GeminiConfig {
    GeminiConfig::new("test-key")
        .expect("non-empty key")
        .with_api_base(server.uri())
}

pub fn design_report_json() -> Value {
    json!({
        "insight_report": {
            "headline": "A Calm Modern Bedroom Retreat",
            "analysis": [
                "Keep surfaces clear to lower visual noise.",
                "Layer warm, dimmable light for evening wind-down.",
                "Use matte oak and linen for tactile softness."
            ]
        },
        "emotional_story": "Soft morning light drifts across linen bedding and pale oak.",
        "visual_prompt": "Photorealistic modern bedroom, matte oak platform bed, linen bedding, soft morning light, 16:9",
        "implementation_steps": [
            {"step": "Declutter and remove excess furniture", "effort": "Low", "estimated_days": 1},
            {"step": "Repaint walls in warm greige", "effort": "Medium", "estimated_days": 2},
            {"step": "Install dimmable warm lighting", "effort": "Medium", "estimated_days": 1.5},
            {"step": "Replace bed frame with low oak platform", "effort": "High", "estimated_days": 3}
        ],
        "estimated_budget": "$1,500 - $3,000"
    })
}

pub fn architectural_brief_json() -> Value {
    json!({
        "conceptual_headline": "The Still Courtyard House",
        "emotion_deconstruction": [
            "Filtered light instead of glare",
            "Slow, layered thresholds",
            "Water as a calming anchor"
        ],
        "regional_hazards": [
            "Extreme summer heat above 40C",
            "Intense monsoon downpours and urban flooding"
        ],
        "design_synthesis_statement": "A shaded courtyard that cools the house also slows the pace of daily life.",
        "key_features": [
            {
                "feature_name": "Central stepwell courtyard",
                "emotional_rationale": "Still water and shade create calm.",
                "resilience_rationale": "Collects monsoon runoff and cools by evaporation.",
                "dual_purpose_synthesis": "Serenity and flood management from one gesture."
            },
            {
                "feature_name": "Jaali screen facade",
                "emotional_rationale": "Dappled light softens the interior.",
                "resilience_rationale": "Blocks solar gain while ventilating.",
                "dual_purpose_synthesis": "Privacy, calm and passive cooling."
            },
            {
                "feature_name": "Raised plinth",
                "emotional_rationale": "A gentle ascent marks arrival.",
                "resilience_rationale": "Keeps floors above flood level.",
                "dual_purpose_synthesis": "Ceremony and protection."
            }
        ],
        "visual_prompt": "Photorealistic exterior of a low courtyard house in Hyderabad, laterite stone, jaali screens, dusk",
        "floor_plan_prompt": "Top-down 2D floor plan of a courtyard house, labeled rooms, white background"
    })
}

/// Wraps `text` the way generateContent returns it.
pub fn text_envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

pub fn image_envelope() -> Value {
    json!({
        "predictions": [{"bytesBase64Encoded": PNG_BASE64, "mimeType": "image/png"}]
    })
}

pub async fn mount_text(server: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path_regex(r":generateContent$"))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mount_image(server: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path_regex(r":predict$"))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Request paths and JSON bodies in the order the server received them.
pub async fn received(server: &MockServer) -> Vec<(String, Value)> {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .map(|request| {
            (
                request.url.path().to_string(),
                request.body_json::<Value>().expect("JSON body"),
            )
        })
        .collect()
}
