use serde::{Deserialize, Serialize};

/// Field-by-field comparison outcome between front OCR and back-ID data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossValidationReport {
    pub match_score: f32,
    pub overall_consistency: bool,
    pub id_number_match: bool,
    pub expiry_match: bool,
    pub authority_match: bool,
    pub name_match: bool,
    pub dob_match: bool,
    pub address_match: bool,
    pub height_match: bool,
    pub gender_match: bool,
    pub eye_color_match: bool,
    pub weight_match: bool,
    pub middle_name_match: bool,
    pub vehicle_class_match: bool,
    pub discriminator_match: bool,
    pub discrepancies: Vec<String>,
    pub requires_manual_review: bool,
    pub manual_review_reason: Option<String>,
}

impl CrossValidationReport {
    pub fn empty_extraction_failure() -> Self {
        Self {
            match_score: 0.6,
            overall_consistency: false,
            id_number_match: false,
            expiry_match: false,
            authority_match: false,
            name_match: false,
            dob_match: false,
            address_match: false,
            height_match: false,
            gender_match: false,
            eye_color_match: false,
            weight_match: false,
            middle_name_match: false,
            vehicle_class_match: false,
            discriminator_match: false,
            discrepancies: Vec::new(),
            requires_manual_review: true,
            manual_review_reason: Some(
                "Data extraction failed — unable to compare front vs back.".to_string(),
            ),
        }
    }
}
