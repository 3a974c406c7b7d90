use serde::{Deserialize, Serialize};

use super::fields::OcrFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentRole {
    Front,
    Back,
    Selfie,
}

/// Metadata for one uploaded image artifact, owned by exactly one
/// `VerificationRequest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentArtifact {
    pub logical_path: String,
    pub original_filename: String,
    pub byte_size: u64,
    pub mime_type: String,
    pub role: DocumentRole,
    pub quality_score: Option<f32>,
    pub extracted_fields: Option<OcrFields>,
}

impl DocumentArtifact {
    pub fn new(logical_path: impl Into<String>, role: DocumentRole, mime_type: impl Into<String>, byte_size: u64) -> Self {
        let logical_path = logical_path.into();
        let original_filename = logical_path
            .rsplit('/')
            .next()
            .unwrap_or(&logical_path)
            .to_string();
        Self {
            logical_path,
            original_filename,
            byte_size,
            mime_type: mime_type.into(),
            role,
            quality_score: None,
            extracted_fields: None,
        }
    }
}
