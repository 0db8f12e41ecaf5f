//! Instructions sent to every live vision provider.

/// System-level role for chat-style providers.
pub const SYSTEM_PROMPT: &str = "You are an assistant that tags images briefly and precisely.";

/// The response contract: JSON only, 3 to 10 tags, numeric confidence.
pub const TAG_PROMPT: &str = concat!(
    "Return ONLY a JSON object in the format ",
    r#"{"tags":[{"label":"string","confidence":number}]}. "#,
    "Include 3 to 10 relevant tags. confidence must be between 0 and 1. ",
    "No additional text."
);

/// MIME type assumed when the upload did not declare one.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Single-prompt form for providers without a separate system role.
pub fn combined_prompt() -> String {
    format!("{SYSTEM_PROMPT}\n\n{TAG_PROMPT}")
}
