use serde::{Deserialize, Serialize};

/// Face-match and liveness outcome plus the per-subscore diagnostics that
/// produced it, kept around for audit trail and manual review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiometricReport {
    pub face_similarity: f32,
    pub liveness_score: f32,
    pub face_passed: bool,
    pub liveness_passed: bool,
    pub face_subscores: FaceSubscores,
    pub liveness_subscores: LivenessSubscores,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceSubscores {
    pub feature_similarity: f32,
    pub region_cosine: f32,
    pub multiscale_cosine: f32,
    pub quality_boost: f32,
    pub confidence: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LivenessSubscores {
    pub face_in_circle: f32,
    pub resolution_adequacy: f32,
    pub color_richness: f32,
    pub lighting_naturalness: f32,
    pub texture_complexity: f32,
    pub edge_sharpness: f32,
}
