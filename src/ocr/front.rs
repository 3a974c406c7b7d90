//! Front-of-ID OCR orchestration, spec.md §4.2. Grounded on the
//! teacher's `processing::enhanced_ocr` recognize-then-clean-then-match
//! pipeline, generalized from passport-only MRZ extraction to the fixed
//! `FieldName` dispatch table in `ocr::patterns`.

use chrono::Utc;

use crate::capabilities::Ocr;
use crate::config::Config;
use crate::error::Result;
use crate::gateway::image_ops::preprocess_for_ocr;
use crate::models::{FieldName, OcrFields};

use super::dates::{classify_date_role, parse_date_token, DateRole};
use super::patterns::{patterns_for, tier_confidence, DocumentType};

pub const FRONT_OCR_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 .,/:()-[]";

#[derive(Debug, Clone)]
pub struct FrontOcrResult {
    pub fields: OcrFields,
    pub quality_score: f32,
}

/// Steps 1-6 of spec.md §4.2. `psm_auto=false` requests the single-block
/// page-segmentation mode the spec calls for on the front side.
pub async fn recognize_front(
    image: &image::DynamicImage,
    doc_type: DocumentType,
    ocr: &dyn Ocr,
    config: &Config,
) -> Result<FrontOcrResult> {
    let preprocessed = preprocess_for_ocr(image, config);
    let output = ocr.recognize(&preprocessed, FRONT_OCR_WHITELIST, false).await?;
    let cleaned = clean_whitespace(&output.text);

    let mut fields = OcrFields::new(cleaned.clone());
    let mut recognized_dates: Vec<(FieldName, crate::ocr::dates::NormalizedDate, f32)> = Vec::new();

    for field in FieldName::ALL {
        if matches!(
            field,
            FieldName::DateOfBirth | FieldName::ExpirationDate | FieldName::IssueDate
        ) {
            continue; // dates are disambiguated separately below
        }
        for pattern in patterns_for(field, doc_type) {
            if let Some(caps) = pattern.regex.captures(&cleaned) {
                if let Some(m) = caps.get(1) {
                    let confidence = tier_confidence(pattern.strict);
                    fields.set(field, m.as_str().trim(), confidence);
                    break;
                }
            }
        }
    }

    // Date tokens: collect every match of any date-shaped pattern across
    // the three date fields, then disambiguate by role (step 5/6).
    for field in [FieldName::DateOfBirth, FieldName::ExpirationDate, FieldName::IssueDate] {
        for pattern in patterns_for(field, doc_type) {
            if let Some(caps) = pattern.regex.captures(&cleaned) {
                if let Some(m) = caps.get(1) {
                    if let Some(parsed) = parse_date_token(m.as_str()) {
                        recognized_dates.push((field, parsed, tier_confidence(pattern.strict)));
                        break;
                    }
                }
            }
        }
    }

    for (labeled_field, date, confidence) in &recognized_dates {
        let role = classify_date_role(date);
        let resolved_field = match role {
            DateRole::Expiration => FieldName::ExpirationDate,
            DateRole::DateOfBirth => FieldName::DateOfBirth,
            DateRole::Ambiguous => *labeled_field,
        };
        fields.set(resolved_field, date.render_mm_dd_yyyy(), *confidence);
    }

    let quality_score = compute_quality_score(output.mean_confidence, cleaned.len());

    Ok(FrontOcrResult { fields, quality_score })
}

fn clean_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Quality score = tesseract confidence/100, scaled down for very short
/// or very long recognized text (spec.md §4.2 step 6).
fn compute_quality_score(mean_confidence: f32, char_count: usize) -> f32 {
    let base = mean_confidence.clamp(0.0, 1.0);
    let scaled = if char_count < 50 {
        base * 0.7
    } else if char_count > 2000 {
        base * 0.8
    } else {
        base
    };
    scaled.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Default)]
pub struct FrontValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validation operation exposed separately from extraction (spec.md
/// §4.2): missing-field errors, expired/low-confidence warnings.
pub fn validate_front(fields: &OcrFields) -> FrontValidation {
    let mut v = FrontValidation::default();

    if fields.get(FieldName::FirstName).is_none() && fields.get(FieldName::Name).is_none() {
        v.errors.push("missing_name".to_string());
    }
    if fields.get(FieldName::DocumentNumber).is_none() {
        v.errors.push("missing_document_number".to_string());
    }
    match fields.get(FieldName::DateOfBirth).and_then(parse_date_token) {
        None => v.errors.push("invalid_dob".to_string()),
        Some(_) => {}
    }
    match fields.get(FieldName::ExpirationDate).and_then(parse_date_token) {
        None => v.errors.push("invalid_expiration".to_string()),
        Some(expiry) => {
            if expiry.0 < Utc::now().date_naive() {
                v.warnings.push("document_expired".to_string());
            }
        }
    }
    if fields.mean_confidence() < 0.6 {
        v.warnings.push("low_confidence".to_string());
    }

    v
}
