// Defaults and environment variable names for the generation backends.

/// Primary credential variable.
pub const API_KEY_VAR: &str = "API_KEY";
/// Checked when `API_KEY` is absent.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";
pub const TEXT_MODEL_VAR: &str = "EMOTISPACE_TEXT_MODEL";
pub const IMAGE_MODEL_VAR: &str = "EMOTISPACE_IMAGE_MODEL";
pub const IMAGE_SUFFIX_VAR: &str = "EMOTISPACE_IMAGE_SUFFIX";
pub const HTTP_TIMEOUT_VAR: &str = "EMOTISPACE_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

/// Every image is requested in this encoding.
pub const IMAGE_MIME_TYPE: &str = "image/png";

pub const DEFAULT_PORT: u16 = 9900;

/// File names used when writing images to disk.
pub const DESIGN_IMAGE_FILE: &str = "emotispace-design.png";
pub const EXTERIOR_IMAGE_FILE: &str = "emotispace-architecture.png";
pub const FLOOR_PLAN_IMAGE_FILE: &str = "emotispace-floorplan.png";
