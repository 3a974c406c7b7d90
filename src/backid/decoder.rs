//! Back-ID Decoder orchestration, spec.md §4.3. Runs the ordered
//! attempt chain (hardware PDF417 → vision-model → OCR fallback),
//! always runs the manual AAMVA parser, classifies validation, and
//! composes the merged `BackIdData`.

use image::DynamicImage;

use crate::capabilities::{Barcode, Ocr, VisionModel};
use crate::config::Config;
use crate::error::Result;
use crate::gateway::image_ops::preprocess_for_barcode;
use crate::models::{BackIdData, FieldName, OcrFields, Pdf417Payload, ValidationTag};

use super::aamva::parse_aamva;

const BACK_OCR_WHITELIST: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 .,/:()[]-";

const CRITICAL_FIELDS: [FieldName; 4] = [
    FieldName::FirstName,
    FieldName::LastName,
    FieldName::DocumentNumber,
    FieldName::DateOfBirth,
];

/// Steps 1-6 of spec.md §4.3.
pub async fn decode_back(
    image: &DynamicImage,
    barcode: &dyn Barcode,
    vision: &dyn VisionModel,
    ocr: &dyn Ocr,
    config: &Config,
) -> Result<BackIdData> {
    let preprocessed = preprocess_for_barcode(image, config);

    // Step 1: hardware-style PDF417 decode, and step 3's OCR fallback run
    // concurrently — both are independent I/O/compute over the same
    // preprocessed image (spec.md §5).
    let (barcode_text, ocr_output) = tokio::join!(
        barcode.decode_pdf417(&preprocessed),
        ocr.recognize(&preprocessed, BACK_OCR_WHITELIST, true)
    );
    let mut raw_text = barcode_text?;

    // Step 2: vision-model decode, only attempted if the hardware reader
    // came back empty.
    if raw_text.is_none() {
        if let Some(answer) = vision.ask_pdf417_payload(&preprocessed).await? {
            if answer.found && !answer.payload.is_empty() {
                raw_text = Some(answer.payload);
            }
        }
    }

    let mut ocr_fields: Option<OcrFields> = None;
    let mut synthesized_payload: Option<Pdf417Payload> = None;

    if raw_text.is_none() {
        // Step 3: OCR fallback. If an id_number is recoverable, synthesize
        // a partial payload.
        if let Ok(output) = &ocr_output {
            if !output.text.is_empty() {
                let extracted = parse_aamva(&output.text);
                if extracted.get(FieldName::DocumentNumber).is_some() {
                    synthesized_payload = Some(Pdf417Payload {
                        raw_text: output.text.clone(),
                        parsed: extracted.clone(),
                        confidence: 0.6,
                        validation: ValidationTag::Partial,
                    });
                }
                ocr_fields = Some(extracted);
            }
        }
    }

    // Step 4: parse payload. Always run the manual parser even if a
    // library decoded text, and merge: manual fields win only where the
    // library's are empty.
    let pdf417 = match raw_text {
        Some(text) => {
            let manual = parse_aamva(&text);
            let mut payload = Pdf417Payload {
                raw_text: text,
                parsed: manual.clone(),
                confidence: 0.9,
                validation: ValidationTag::Valid,
            };
            payload.parsed.merge_preferring(&manual);
            Some(payload)
        }
        None => synthesized_payload,
    };

    // Step 5: classify validation on whichever payload/ocr data exists.
    let classification_source: OcrFields = pdf417
        .as_ref()
        .map(|p| p.parsed.clone())
        .or_else(|| ocr_fields.clone())
        .unwrap_or_default();

    let pdf417 = match pdf417 {
        Some(mut p) => {
            let (tag, confidence) = classify_validation(&classification_source);
            p.validation = tag;
            p.confidence = p.confidence.min(confidence);
            Some(p)
        }
        None => Some(Pdf417Payload::empty_invalid()),
    };

    // Step 6: compose, barcode wins for every field it populated.
    let mut merged = ocr_fields.clone().unwrap_or_default();
    if let Some(payload) = &pdf417 {
        merged.merge_preferring(&payload.parsed);
    }

    Ok(BackIdData {
        pdf417,
        ocr: ocr_fields,
        merged,
        verification_codes: Vec::new(),
        security_features: Vec::new(),
    })
}

fn classify_validation(fields: &OcrFields) -> (ValidationTag, f32) {
    let missing_critical = CRITICAL_FIELDS
        .iter()
        .filter(|f| fields.get(**f).is_none())
        .count();
    let tag = if missing_critical > 2 {
        ValidationTag::Invalid
    } else if missing_critical >= 1 {
        ValidationTag::Partial
    } else {
        ValidationTag::Valid
    };
    let populated = fields.values.len() as f32;
    let total = 10.0_f32.max(crate::models::FieldName::ALL.len() as f32);
    let confidence = (populated / total).min(0.95);
    (tag, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{NoopBarcode, NoopOcr, NoopVisionModel};

    #[tokio::test]
    async fn all_noop_capabilities_yield_invalid_back_data() {
        let img = DynamicImage::new_rgb8(10, 10);
        let data = decode_back(&img, &NoopBarcode, &NoopVisionModel, &NoopOcr, &Config::default())
            .await
            .unwrap();
        assert!(data.barcode_extraction_failed());
    }

    #[test]
    fn classify_validation_three_missing_critical_is_invalid() {
        let fields = OcrFields::new("");
        let (tag, _) = classify_validation(&fields);
        assert_eq!(tag, ValidationTag::Invalid);
    }

    #[test]
    fn classify_validation_all_critical_present_is_valid() {
        let mut fields = OcrFields::new("");
        fields.set(FieldName::FirstName, "JANE", 0.9);
        fields.set(FieldName::LastName, "DOE", 0.9);
        fields.set(FieldName::DocumentNumber, "D1234567", 0.9);
        fields.set(FieldName::DateOfBirth, "02/14/1990", 0.9);
        let (tag, confidence) = classify_validation(&fields);
        assert_eq!(tag, ValidationTag::Valid);
        assert!(confidence > 0.0);
    }
}
