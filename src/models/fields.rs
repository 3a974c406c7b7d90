use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The fixed enumeration of field names recognized anywhere in the
/// pipeline (front OCR, PDF417 payload, back-OCR fallback). Kept as an
/// enum rather than a bare `&str` so the cross validator and AAMVA parser
/// can exhaustively match rather than risk a typo'd string key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldName {
    Name,
    FirstName,
    LastName,
    MiddleName,
    DocumentNumber,
    DateOfBirth,
    ExpirationDate,
    IssueDate,
    Address,
    City,
    State,
    ZipCode,
    Sex,
    Height,
    Weight,
    EyeColor,
    Nationality,
    IssuingAuthority,
    VehicleClass,
    Restrictions,
    Endorsements,
    DocumentDiscriminator,
}

impl FieldName {
    pub const ALL: [FieldName; 22] = [
        FieldName::Name,
        FieldName::FirstName,
        FieldName::LastName,
        FieldName::MiddleName,
        FieldName::DocumentNumber,
        FieldName::DateOfBirth,
        FieldName::ExpirationDate,
        FieldName::IssueDate,
        FieldName::Address,
        FieldName::City,
        FieldName::State,
        FieldName::ZipCode,
        FieldName::Sex,
        FieldName::Height,
        FieldName::Weight,
        FieldName::EyeColor,
        FieldName::Nationality,
        FieldName::IssuingAuthority,
        FieldName::VehicleClass,
        FieldName::Restrictions,
        FieldName::Endorsements,
        FieldName::DocumentDiscriminator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::FirstName => "first_name",
            FieldName::LastName => "last_name",
            FieldName::MiddleName => "middle_name",
            FieldName::DocumentNumber => "document_number",
            FieldName::DateOfBirth => "date_of_birth",
            FieldName::ExpirationDate => "expiration_date",
            FieldName::IssueDate => "issue_date",
            FieldName::Address => "address",
            FieldName::City => "city",
            FieldName::State => "state",
            FieldName::ZipCode => "zip_code",
            FieldName::Sex => "sex",
            FieldName::Height => "height",
            FieldName::Weight => "weight",
            FieldName::EyeColor => "eye_color",
            FieldName::Nationality => "nationality",
            FieldName::IssuingAuthority => "issuing_authority",
            FieldName::VehicleClass => "vehicle_class",
            FieldName::Restrictions => "restrictions",
            FieldName::Endorsements => "endorsements",
            FieldName::DocumentDiscriminator => "document_discriminator",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured field extraction result: values, a parallel confidence map,
/// and the raw recognized text the values were parsed from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrFields {
    pub values: HashMap<FieldName, String>,
    pub confidence: HashMap<FieldName, f32>,
    pub raw_text: String,
}

impl OcrFields {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            values: HashMap::new(),
            confidence: HashMap::new(),
            raw_text: raw_text.into(),
        }
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>, confidence: f32) {
        self.values.insert(field, value.into());
        self.confidence.insert(field, confidence.clamp(0.0, 1.0));
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.values.get(&field).map(|s| s.as_str())
    }

    pub fn mean_confidence(&self) -> f32 {
        if self.confidence.is_empty() {
            return 0.0;
        }
        self.confidence.values().sum::<f32>() / self.confidence.len() as f32
    }

    /// Merge `other`'s fields in, preferring `other`'s value wherever it
    /// is populated — used to let a barcode payload win over OCR.
    pub fn merge_preferring(&mut self, other: &OcrFields) {
        for field in FieldName::ALL {
            if let Some(v) = other.values.get(&field) {
                self.values.insert(field, v.clone());
                if let Some(c) = other.confidence.get(&field) {
                    self.confidence.insert(field, *c);
                }
            }
        }
    }
}
