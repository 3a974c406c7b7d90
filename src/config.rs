//! Immutable threshold configuration, loaded once and passed by reference
//! to every comparison/threshold site in the pipeline (spec.md §6 table;
//! Design Notes: "Global mutable config" — no module-level `const`
//! threshold is allowed to exist outside this struct).
//!
//! Grounded on the environment-variable loader convention used across the
//! retrieved corpus's `core-config` crate: every field has a sane default
//! and an optional `VERIFY_ID_*` environment override, never a process
//! global or `static mut`.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Match-score floor for cross-validation consistency.
    pub cross_validation_threshold: f32,
    /// Face-similarity floor for `face_passed`.
    pub face_match_threshold: f32,
    /// Passive-liveness floor for `liveness_passed`.
    pub liveness_threshold: f32,
    /// Preprocessing max longest side, in pixels.
    pub ocr_max_dim_px: u32,
    /// Back-of-ID preprocessing min longest side, in pixels.
    pub back_ocr_min_dim_px: u32,
    /// Cross-check address word-overlap match floor.
    pub address_similarity_pass: f32,
    /// Weight cross-check tolerance, in pounds.
    pub weight_tolerance_lbs: i32,
    /// Height cross-check tolerance, in inches.
    pub height_tolerance_in: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cross_validation_threshold: 0.7,
            face_match_threshold: 0.65,
            liveness_threshold: 0.6,
            ocr_max_dim_px: 2000,
            back_ocr_min_dim_px: 1200,
            address_similarity_pass: 0.7,
            weight_tolerance_lbs: 5,
            height_tolerance_in: 1.0,
        }
    }
}

impl Config {
    /// Overlay environment variables onto the defaults. Unset or
    /// unparsable variables are silently left at their default, mirroring
    /// the corpus's "never fail startup over a bad optional override"
    /// convention.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = env_f32("VERIFY_ID_CROSS_VALIDATION_THRESHOLD") {
            cfg.cross_validation_threshold = v;
        }
        if let Some(v) = env_f32("VERIFY_ID_FACE_MATCH_THRESHOLD") {
            cfg.face_match_threshold = v;
        }
        if let Some(v) = env_f32("VERIFY_ID_LIVENESS_THRESHOLD") {
            cfg.liveness_threshold = v;
        }
        if let Some(v) = env_u32("VERIFY_ID_OCR_MAX_DIM_PX") {
            cfg.ocr_max_dim_px = v;
        }
        if let Some(v) = env_u32("VERIFY_ID_BACK_OCR_MIN_DIM_PX") {
            cfg.back_ocr_min_dim_px = v;
        }
        if let Some(v) = env_f32("VERIFY_ID_ADDRESS_SIMILARITY_PASS") {
            cfg.address_similarity_pass = v;
        }
        if let Ok(v) = env::var("VERIFY_ID_WEIGHT_TOLERANCE_LBS") {
            if let Ok(v) = v.parse::<i32>() {
                cfg.weight_tolerance_lbs = v;
            }
        }
        if let Some(v) = env_f32("VERIFY_ID_HEIGHT_TOLERANCE_IN") {
            cfg.height_tolerance_in = v;
        }
        cfg
    }
}

fn env_f32(key: &str) -> Option<f32> {
    env::var(key).ok().and_then(|v| v.parse::<f32>().ok())
}

fn env_u32(key: &str) -> Option<u32> {
    env::var(key).ok().and_then(|v| v.parse::<u32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let cfg = Config::default();
        assert_eq!(cfg.cross_validation_threshold, 0.7);
        assert_eq!(cfg.face_match_threshold, 0.65);
        assert_eq!(cfg.liveness_threshold, 0.6);
        assert_eq!(cfg.ocr_max_dim_px, 2000);
        assert_eq!(cfg.back_ocr_min_dim_px, 1200);
        assert_eq!(cfg.address_similarity_pass, 0.7);
        assert_eq!(cfg.weight_tolerance_lbs, 5);
        assert_eq!(cfg.height_tolerance_in, 1.0);
    }

    #[test]
    fn env_override_applies() {
        env::set_var("VERIFY_ID_FACE_MATCH_THRESHOLD", "0.9");
        let cfg = Config::from_env();
        assert_eq!(cfg.face_match_threshold, 0.9);
        env::remove_var("VERIFY_ID_FACE_MATCH_THRESHOLD");
    }

    #[test]
    fn malformed_env_override_is_ignored() {
        env::set_var("VERIFY_ID_ADDRESS_SIMILARITY_PASS", "not-a-number");
        let cfg = Config::from_env();
        assert_eq!(cfg.address_similarity_pass, Config::default().address_similarity_pass);
        env::remove_var("VERIFY_ID_ADDRESS_SIMILARITY_PASS");
    }
}
