use serde::{Deserialize, Serialize};

use super::fields::OcrFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationTag {
    Valid,
    Partial,
    Invalid,
}

/// The raw decoded barcode payload plus everything the AAMVA parser
/// recovered from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pdf417Payload {
    pub raw_text: String,
    pub parsed: OcrFields,
    pub confidence: f32,
    pub validation: ValidationTag,
}

impl Pdf417Payload {
    pub fn empty_invalid() -> Self {
        Self {
            raw_text: String::new(),
            parsed: OcrFields::default(),
            confidence: 0.0,
            validation: ValidationTag::Invalid,
        }
    }
}

/// Composite back-of-ID extraction result: the decoder tries PDF417
/// first, OCR second, then merges — barcode wins wherever it populated a
/// field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackIdData {
    pub pdf417: Option<Pdf417Payload>,
    pub ocr: Option<OcrFields>,
    pub merged: OcrFields,
    pub verification_codes: Vec<String>,
    pub security_features: Vec<String>,
}

impl BackIdData {
    /// `barcode_extraction_failed` per spec.md §3: the PDF417 payload is
    /// invalid AND no OCR fields were parsed on the back.
    pub fn barcode_extraction_failed(&self) -> bool {
        let pdf_invalid = match &self.pdf417 {
            Some(p) => p.validation == ValidationTag::Invalid,
            None => true,
        };
        let ocr_empty = match &self.ocr {
            Some(o) => o.values.is_empty(),
            None => true,
        };
        pdf_invalid && ocr_empty
    }
}
