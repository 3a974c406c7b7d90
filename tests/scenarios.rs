//! End-to-end scenarios S1-S6, driven through the public engine API
//! against fixed OCR/barcode capabilities and synthetic imagery so every
//! comparison is deterministic.

use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, Rgb, RgbImage};

use verify_id::capabilities::{Barcode, Capabilities, NoopFaceDetector, NoopVisionModel, Ocr, OcrOutput};
use verify_id::config::Config;
use verify_id::error::Result;
use verify_id::gateway::blobstore::InMemoryBlobStore;
use verify_id::models::RequestStatus;
use verify_id::ocr::DocumentType;
use verify_id::store::InMemoryRecordStore;
use verify_id::VerificationEngine;

struct FixedOcr {
    text: &'static str,
    confidence: f32,
}

#[async_trait]
impl Ocr for FixedOcr {
    async fn recognize(&self, _image: &DynamicImage, _whitelist: &str, _psm_auto: bool) -> Result<OcrOutput> {
        Ok(OcrOutput { text: self.text.to_string(), mean_confidence: self.confidence })
    }
}

struct FixedBarcode(&'static str);

#[async_trait]
impl Barcode for FixedBarcode {
    async fn decode_pdf417(&self, _image: &DynamicImage) -> Result<Option<String>> {
        Ok(Some(self.0.to_string()))
    }
}

const FRONT_TEXT: &str = "Last Name: DOE First Name: JANE Document No: D1234567 \
    Date of Birth: 02/14/1990 Expir: 05/10/2030 Issued By: CALIFORNIA";

fn matching_back_payload() -> &'static str {
    "DAQD1234567\x1eDBA05102030\x1eDACJANE\x1eDCSDOE\x1eDBB02141990\x1eDAJCA\x1e"
}

fn mismatched_back_payload() -> &'static str {
    "DAQX9999999\x1eDBA05102030\x1eDACJANE\x1eDCSDOE\x1eDBB02141990\x1eDAJCA\x1e"
}

/// A 900x900 face-like image: skin-toned checkerboard inside the
/// face-in-circle gate radius (roughly half the circle, landing inside
/// the spec's [0.15, 0.70] acceptance band), a color-varying background
/// for richness, and left/right mirror symmetry throughout.
fn liveness_friendly_photo() -> DynamicImage {
    let size = 900u32;
    let radius = 0.35 * size as f32;
    let center = size as f32 / 2.0;
    RgbImage::from_fn(size, size, |x, y| {
        let mx = if x <= size / 2 { x } else { size - 1 - x };
        let dist = (((mx as f32 - center).powi(2) + (y as f32 - center).powi(2))).sqrt();
        if dist <= radius {
            if (mx / 6 + y / 6) % 2 == 0 {
                Rgb([180, 140, 120])
            } else {
                Rgb([90, 70, 140])
            }
        } else {
            Rgb([(mx % 256) as u8, (y % 256) as u8, ((mx + y) % 256) as u8])
        }
    })
    .into()
}

/// Same overall texture as the friendly photo, but all skin-toned pixels
/// are pushed into a corner far from the center, so the face-in-circle
/// gate fails and liveness collapses to near zero.
fn liveness_unfriendly_photo() -> DynamicImage {
    let size = 900u32;
    RgbImage::from_fn(size, size, |x, y| {
        let mx = if x <= size / 2 { x } else { size - 1 - x };
        if mx < size / 6 && y < size / 6 {
            Rgb([180, 140, 120])
        } else {
            Rgb([(mx % 256) as u8, (y % 256) as u8, ((mx + y) % 256) as u8])
        }
    })
    .into()
}

/// A flat, featureless image with none of the friendly photo's skin
/// tones or structure, used as an ID photo that should not face-match
/// against the friendly selfie.
fn unrelated_photo() -> DynamicImage {
    let size = 900u32;
    RgbImage::from_pixel(size, size, Rgb([20, 200, 20])).into()
}

fn encode_jpeg(image: &DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .expect("encode fixture image");
    buf
}

fn engine_with(ocr_text: &'static str, back_payload: &'static str) -> (VerificationEngine, Arc<InMemoryBlobStore>) {
    let blobs = Arc::new(InMemoryBlobStore::new());
    let capabilities = Capabilities {
        ocr: Box::new(FixedOcr { text: ocr_text, confidence: 0.9 }),
        barcode: Box::new(FixedBarcode(back_payload)),
        face_detector: Box::new(NoopFaceDetector),
        vision: Box::new(NoopVisionModel),
    };
    let engine = VerificationEngine::new(capabilities, Config::default(), blobs.clone(), Arc::new(InMemoryRecordStore::new()));
    (engine, blobs)
}

fn degraded_engine() -> (VerificationEngine, Arc<InMemoryBlobStore>) {
    let blobs = Arc::new(InMemoryBlobStore::new());
    let engine = VerificationEngine::new(Capabilities::degraded(), Config::default(), blobs.clone(), Arc::new(InMemoryRecordStore::new()));
    (engine, blobs)
}

#[tokio::test]
async fn s1_happy_path_reaches_verified() {
    let (engine, blobs) = engine_with(FRONT_TEXT, matching_back_payload());
    let photo = encode_jpeg(&liveness_friendly_photo());
    blobs.put("front", photo.clone());
    blobs.put("back", encode_jpeg(&unrelated_photo())); // barcode comes from the FixedBarcode double, not real bytes
    blobs.put("selfie", photo);

    let request = engine.initialize("subject-1", "tenant-1").await.unwrap();
    engine.submit_front(request.id, "front", DocumentType::DriversLicense).await.unwrap();
    engine.submit_back(request.id, "back").await.unwrap();
    let cross_validated = engine.cross_validate(request.id).await.unwrap();
    assert!(cross_validated.cross_validation_report.as_ref().unwrap().match_score >= 0.9);

    engine.submit_live(request.id, "selfie").await.unwrap();
    let finalized = engine.finalize(request.id).await.unwrap();

    assert_eq!(finalized.status, RequestStatus::Verified);
    assert!(finalized.documents_match);
}

#[tokio::test]
async fn s2_id_mismatch_fails_at_cross_validation() {
    let (engine, blobs) = engine_with(FRONT_TEXT, mismatched_back_payload());
    let photo = encode_jpeg(&liveness_friendly_photo());
    blobs.put("front", photo.clone());
    blobs.put("back", encode_jpeg(&unrelated_photo()));
    blobs.put("selfie", photo);

    let request = engine.initialize("subject-2", "tenant-1").await.unwrap();
    engine.submit_front(request.id, "front", DocumentType::DriversLicense).await.unwrap();
    engine.submit_back(request.id, "back").await.unwrap();
    let finalized = engine.cross_validate(request.id).await.unwrap();

    assert_eq!(finalized.status, RequestStatus::Failed);
    assert!(!finalized.documents_match);
    assert_eq!(finalized.failure_reason.as_deref(), Some("Front and back do not match the same person"));
}

#[tokio::test]
async fn s3_unreadable_back_routes_to_manual_review() {
    let (engine, blobs) = degraded_engine(); // Noop barcode + Noop OCR => back extraction fails entirely
    let photo = encode_jpeg(&liveness_friendly_photo());
    blobs.put("front", photo.clone());
    blobs.put("back", encode_jpeg(&unrelated_photo()));
    blobs.put("selfie", photo);

    let request = engine.initialize("subject-3", "tenant-1").await.unwrap();
    engine.submit_front(request.id, "front", DocumentType::Generic).await.unwrap();
    let after_back = engine.submit_back(request.id, "back").await.unwrap();
    assert!(after_back.barcode_extraction_failed);

    let after_cv = engine.cross_validate(request.id).await.unwrap();
    assert_eq!(after_cv.status, RequestStatus::CrossValidationCompleted);
    assert!(after_cv.cross_validation_report.as_ref().unwrap().requires_manual_review);

    engine.submit_live(request.id, "selfie").await.unwrap();
    let finalized = engine.finalize(request.id).await.unwrap();

    assert_eq!(finalized.status, RequestStatus::ManualReview);
    assert!(finalized.manual_review_reason.is_some());
}

#[tokio::test]
async fn s4_biometric_face_mismatch_fails_at_finalize() {
    let (engine, blobs) = engine_with(FRONT_TEXT, matching_back_payload());
    blobs.put("front", encode_jpeg(&unrelated_photo()));
    blobs.put("back", encode_jpeg(&unrelated_photo()));
    blobs.put("selfie", encode_jpeg(&liveness_friendly_photo()));

    let request = engine.initialize("subject-4", "tenant-1").await.unwrap();
    engine.submit_front(request.id, "front", DocumentType::DriversLicense).await.unwrap();
    engine.submit_back(request.id, "back").await.unwrap();
    engine.cross_validate(request.id).await.unwrap();
    let after_live = engine.submit_live(request.id, "selfie").await.unwrap();
    assert!(!after_live.face_passed);

    let finalized = engine.finalize(request.id).await.unwrap();
    assert_eq!(finalized.status, RequestStatus::Failed);
    assert_eq!(finalized.failure_reason.as_deref(), Some("Face matching failed"));
}

#[tokio::test]
async fn s5_liveness_fail_with_offcenter_face() {
    let (engine, blobs) = engine_with(FRONT_TEXT, matching_back_payload());
    let friendly = encode_jpeg(&liveness_friendly_photo());
    blobs.put("front", friendly.clone());
    blobs.put("back", encode_jpeg(&unrelated_photo()));
    blobs.put("selfie", encode_jpeg(&liveness_unfriendly_photo()));

    let request = engine.initialize("subject-5", "tenant-1").await.unwrap();
    engine.submit_front(request.id, "front", DocumentType::DriversLicense).await.unwrap();
    engine.submit_back(request.id, "back").await.unwrap();
    engine.cross_validate(request.id).await.unwrap();
    let after_live = engine.submit_live(request.id, "selfie").await.unwrap();
    assert!(!after_live.liveness_passed);

    let finalized = engine.finalize(request.id).await.unwrap();
    assert_eq!(finalized.status, RequestStatus::Failed);
    assert_eq!(finalized.failure_reason.as_deref(), Some("Liveness failed"));
}

#[tokio::test]
async fn s6_illegal_transition_leaves_state_unchanged_then_succeeds() {
    let (engine, blobs) = engine_with(FRONT_TEXT, matching_back_payload());
    let photo = encode_jpeg(&liveness_friendly_photo());
    blobs.put("front", photo.clone());
    blobs.put("back", encode_jpeg(&unrelated_photo()));
    blobs.put("selfie", photo);

    let request = engine.initialize("subject-6", "tenant-1").await.unwrap();
    engine.submit_front(request.id, "front", DocumentType::DriversLicense).await.unwrap();
    engine.submit_back(request.id, "back").await.unwrap();

    let illegal = engine.submit_live(request.id, "selfie").await.unwrap_err();
    assert_eq!(illegal.category(), "input");

    let reloaded = engine.get(request.id).await.unwrap();
    assert_eq!(reloaded.status, RequestStatus::BackDocumentProcessed);

    engine.cross_validate(request.id).await.unwrap();
    let after_live = engine.submit_live(request.id, "selfie").await.unwrap();
    assert_eq!(after_live.status, RequestStatus::LiveCaptureCompleted);
}

#[tokio::test]
async fn finalize_is_idempotent_once_terminal() {
    let (engine, blobs) = degraded_engine();
    let photo = encode_jpeg(&liveness_friendly_photo());
    blobs.put("front", photo.clone());
    blobs.put("back", encode_jpeg(&unrelated_photo()));
    blobs.put("selfie", photo);

    let request = engine.initialize("subject-7", "tenant-1").await.unwrap();
    engine.submit_front(request.id, "front", DocumentType::Generic).await.unwrap();
    engine.submit_back(request.id, "back").await.unwrap();
    engine.cross_validate(request.id).await.unwrap();
    engine.submit_live(request.id, "selfie").await.unwrap();

    let first = engine.finalize(request.id).await.unwrap();
    let second = engine.finalize(request.id).await.unwrap();
    assert_eq!(first.status, second.status);
}
