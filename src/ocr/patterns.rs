//! Field-extraction regex tables, dispatched by declared document type.
//! Grounded on the teacher's `processing::enhanced_ocr` lazy_static
//! pattern tables (`DOCUMENT_NUMBER_PATTERNS`, `NAME_PATTERNS`,
//! `DATE_PATTERNS`, etc.) — generalized from the teacher's
//! passport-only, multilingual-label dispatch to spec.md §4.2's
//! per-document-type, specificity-ordered dispatch over the fixed
//! `FieldName` enumeration.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::FieldName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Passport,
    DriversLicense,
    NationalId,
    Generic,
}

impl DocumentType {
    pub fn from_str(s: &str) -> Self {
        match s {
            "passport" => DocumentType::Passport,
            "drivers_license" => DocumentType::DriversLicense,
            "national_id" => DocumentType::NationalId,
            _ => DocumentType::Generic,
        }
    }
}

/// A single extraction rule: a labeled-strict pattern with a confidence
/// floor/ceiling or a shape-only fallback. Patterns for one field are
/// tried in order; the first match wins.
pub struct FieldPattern {
    pub regex: &'static Regex,
    /// true = "labeled strict" tier (0.85-0.90), false = "shape-only" (0.4-0.6)
    pub strict: bool,
}

lazy_static! {
    static ref DOCUMENT_NUMBER_STRICT: Regex =
        Regex::new(r"(?i)(?:document|license|lic|dl|id)\s*(?:no\.?|number|#)\s*[:#]?\s*([A-Z0-9]{5,15})").unwrap();
    static ref DOCUMENT_NUMBER_SHAPE: Regex = Regex::new(r"\b([A-Z][0-9]{6,9})\b").unwrap();

    static ref LAST_NAME_STRICT: Regex =
        Regex::new(r"(?i)(?:last\s*name|surname|family\s*name|ln)\s*[:#]?\s*([A-Za-z'\-]+)").unwrap();
    static ref FIRST_NAME_STRICT: Regex =
        Regex::new(r"(?i)(?:first\s*name|given\s*name|fn)\s*[:#]?\s*([A-Za-z'\-]+)").unwrap();
    static ref MIDDLE_NAME_STRICT: Regex =
        Regex::new(r"(?i)(?:middle\s*name|mn)\s*[:#]?\s*([A-Za-z'\-]+)").unwrap();
    static ref NAME_SHAPE: Regex = Regex::new(r"\b([A-Z]{2,}(?:\s+[A-Z]{2,}){1,3})\b").unwrap();

    static ref DOB_STRICT: Regex =
        Regex::new(r"(?i)(?:date\s*of\s*birth|dob|birth\s*date)\s*[:#]?\s*(\d{1,2}[-./]\d{1,2}[-./]\d{2,4})").unwrap();
    static ref EXPIRATION_STRICT: Regex =
        Regex::new(r"(?i)(?:expir\w*|exp|valid\s*until)\s*[:#]?\s*(\d{1,2}[-./]\d{1,2}[-./]\d{2,4})").unwrap();
    static ref ISSUE_STRICT: Regex =
        Regex::new(r"(?i)(?:issue\w*\s*date|iss)\s*[:#]?\s*(\d{1,2}[-./]\d{1,2}[-./]\d{2,4})").unwrap();
    static ref DATE_SHAPE: Regex = Regex::new(r"\b(\d{1,2}[-./]\d{1,2}[-./]\d{2,4})\b").unwrap();

    static ref ADDRESS_STRICT: Regex =
        Regex::new(r"(?i)(?:address|addr)\s*[:#]?\s*([0-9A-Za-z .,#\-]+)").unwrap();
    static ref CITY_STRICT: Regex = Regex::new(r"(?i)city\s*[:#]?\s*([A-Za-z .\-]+)").unwrap();
    static ref STATE_STRICT: Regex =
        Regex::new(r"(?i)\bstate\s*[:#]?\s*([A-Z]{2})\b").unwrap();
    static ref STATE_SHAPE: Regex = Regex::new(r"\b([A-Z]{2})\s+\d{5}\b").unwrap();
    static ref ZIP_STRICT: Regex = Regex::new(r"(?i)zip\s*(?:code)?\s*[:#]?\s*(\d{5}(?:-\d{4})?)").unwrap();
    static ref ZIP_SHAPE: Regex = Regex::new(r"\b(\d{5}(?:-\d{4})?)\b").unwrap();

    static ref SEX_STRICT: Regex = Regex::new(r"(?i)(?:sex|gender)\s*[:#]?\s*([MF])\b").unwrap();
    static ref HEIGHT_STRICT: Regex =
        Regex::new(r#"(?i)(?:height|hgt|ht)\s*[:#]?\s*(\d[''\-\s]?\d{0,2}\"?)"#).unwrap();
    static ref WEIGHT_STRICT: Regex = Regex::new(r"(?i)(?:weight|wgt)\s*[:#]?\s*(\d{2,3})").unwrap();
    static ref EYE_COLOR_STRICT: Regex =
        Regex::new(r"(?i)(?:eyes?|eye\s*color)\s*[:#]?\s*([A-Za-z]{3,5})\b").unwrap();
    static ref NATIONALITY_STRICT: Regex =
        Regex::new(r"(?i)nationality\s*[:#]?\s*([A-Za-z]+)").unwrap();
    static ref AUTHORITY_STRICT: Regex =
        Regex::new(r"(?i)(?:issu\w*\s*(?:by|authority)|authority)\s*[:#]?\s*([A-Za-z .,\-]+)").unwrap();
    static ref VEHICLE_CLASS_STRICT: Regex =
        Regex::new(r"(?i)(?:class|veh(?:icle)?\s*class)\s*[:#]?\s*([A-Z0-9]{1,3})\b").unwrap();
    static ref RESTRICTIONS_STRICT: Regex =
        Regex::new(r"(?i)restrictions?\s*[:#]?\s*([A-Z0-9, ]{1,10})").unwrap();
    static ref ENDORSEMENTS_STRICT: Regex =
        Regex::new(r"(?i)endorsements?\s*[:#]?\s*([A-Z0-9, ]{1,10})").unwrap();
    static ref DISCRIMINATOR_STRICT: Regex =
        Regex::new(r"(?i)(?:dd|discriminator|doc\s*disc)\s*[:#]?\s*([A-Z0-9]{6,20})").unwrap();
}

/// Patterns for a field in specificity order (strict first, shape last).
/// Identical across document types except `generic`, which only applies
/// the loosest (shape) heuristics — spec.md §4.2 step 4.
pub fn patterns_for(field: FieldName, doc_type: DocumentType) -> Vec<FieldPattern> {
    let generic = doc_type == DocumentType::Generic;
    let strict = |r: &'static Regex| FieldPattern { regex: r, strict: true };
    let shape = |r: &'static Regex| FieldPattern { regex: r, strict: false };

    let mut v = Vec::new();
    match field {
        FieldName::DocumentNumber => {
            if !generic {
                v.push(strict(&DOCUMENT_NUMBER_STRICT));
            }
            v.push(shape(&DOCUMENT_NUMBER_SHAPE));
        }
        FieldName::LastName => {
            if !generic {
                v.push(strict(&LAST_NAME_STRICT));
            }
        }
        FieldName::FirstName => {
            if !generic {
                v.push(strict(&FIRST_NAME_STRICT));
            }
        }
        FieldName::MiddleName => {
            if !generic {
                v.push(strict(&MIDDLE_NAME_STRICT));
            }
        }
        FieldName::Name => {
            v.push(shape(&NAME_SHAPE));
        }
        FieldName::DateOfBirth => {
            if !generic {
                v.push(strict(&DOB_STRICT));
            }
            v.push(shape(&DATE_SHAPE));
        }
        FieldName::ExpirationDate => {
            if !generic {
                v.push(strict(&EXPIRATION_STRICT));
            }
            v.push(shape(&DATE_SHAPE));
        }
        FieldName::IssueDate => {
            if !generic {
                v.push(strict(&ISSUE_STRICT));
            }
            v.push(shape(&DATE_SHAPE));
        }
        FieldName::Address => {
            if !generic {
                v.push(strict(&ADDRESS_STRICT));
            }
        }
        FieldName::City => {
            if !generic {
                v.push(strict(&CITY_STRICT));
            }
        }
        FieldName::State => {
            if !generic {
                v.push(strict(&STATE_STRICT));
            }
            v.push(shape(&STATE_SHAPE));
        }
        FieldName::ZipCode => {
            if !generic {
                v.push(strict(&ZIP_STRICT));
            }
            v.push(shape(&ZIP_SHAPE));
        }
        FieldName::Sex => {
            v.push(strict(&SEX_STRICT));
        }
        FieldName::Height => {
            if !generic {
                v.push(strict(&HEIGHT_STRICT));
            }
        }
        FieldName::Weight => {
            if !generic {
                v.push(strict(&WEIGHT_STRICT));
            }
        }
        FieldName::EyeColor => {
            if !generic {
                v.push(strict(&EYE_COLOR_STRICT));
            }
        }
        FieldName::Nationality => {
            if !generic {
                v.push(strict(&NATIONALITY_STRICT));
            }
        }
        FieldName::IssuingAuthority => {
            if !generic {
                v.push(strict(&AUTHORITY_STRICT));
            }
        }
        FieldName::VehicleClass => {
            if doc_type == DocumentType::DriversLicense {
                v.push(strict(&VEHICLE_CLASS_STRICT));
            }
        }
        FieldName::Restrictions => {
            if doc_type == DocumentType::DriversLicense {
                v.push(strict(&RESTRICTIONS_STRICT));
            }
        }
        FieldName::Endorsements => {
            if doc_type == DocumentType::DriversLicense {
                v.push(strict(&ENDORSEMENTS_STRICT));
            }
        }
        FieldName::DocumentDiscriminator => {
            if !generic {
                v.push(strict(&DISCRIMINATOR_STRICT));
            }
        }
    }
    v
}

/// Confidence assigned by tier (spec.md §4.2 step 6): labeled strict
/// 0.85-0.90, shape-only 0.4-0.6. We take the midpoint of each band;
/// callers may further scale by overall quality.
pub fn tier_confidence(strict: bool) -> f32 {
    if strict {
        0.875
    } else {
        0.5
    }
}
