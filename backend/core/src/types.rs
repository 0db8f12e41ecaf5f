use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// An uploaded image held in memory for the duration of one request.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    bytes: Bytes,
    mime_type: String,
    filename: String,
}

impl ImageBlob {
    pub fn new(
        bytes: impl Into<Bytes>,
        mime_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            filename: filename.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared MIME type as sent by the client (e.g. `image/png`).
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A single descriptive tag with its confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub label: String,
    pub confidence: f64,
}

impl Tag {
    /// Build a tag, clamping the confidence into `[0, 1]`.
    ///
    /// Non-finite confidences collapse to `0.0`.
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Canonical analysis output: `{"tags": [...]}` in provider order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub tags: Vec<Tag>,
}

impl AnalysisResult {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_clamps_confidence() {
        assert_eq!(Tag::new("a", 1.7).confidence, 1.0);
        assert_eq!(Tag::new("a", -0.2).confidence, 0.0);
        assert_eq!(Tag::new("a", f64::NAN).confidence, 0.0);
        assert_eq!(Tag::new("a", f64::INFINITY).confidence, 0.0);
        assert_eq!(Tag::new("a", 0.42).confidence, 0.42);
    }

    #[test]
    fn result_serializes_to_canonical_shape() {
        let result = AnalysisResult::new(vec![Tag::new("cat", 0.9)]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"tags": [{"label": "cat", "confidence": 0.9}]}));
    }

    #[test]
    fn empty_result_still_has_tags_array() {
        let json = serde_json::to_value(AnalysisResult::empty()).unwrap();
        assert_eq!(json, serde_json::json!({"tags": []}));
    }

    #[test]
    fn image_blob_reports_length() {
        let blob = ImageBlob::new(vec![1u8, 2, 3], "image/png", "pixel.png");
        assert_eq!(blob.len(), 3);
        assert_eq!(blob.mime_type(), "image/png");
        assert_eq!(blob.filename(), "pixel.png");
        assert!(!blob.is_empty());
    }
}
