//! The orchestrator's public API (spec.md §6): `initialize`,
//! `submit_front`, `submit_back`, `cross_validate`, `submit_live`,
//! `finalize`, `get`, and the admin `approve`/`reject` overrides. Every
//! mutating method computes a fully-formed next-state record and commits
//! it in one `RecordStore::put` call (spec.md §5 ordering guarantee).

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::backid::decode_back;
use crate::biometric;
use crate::capabilities::Capabilities;
use crate::config::Config;
use crate::crossvalidate::cross_validate as run_cross_validate;
use crate::error::{Result, VerificationError};
use crate::gateway::{decode, detect_mime, BlobStore};
use crate::models::{DocumentArtifact, DocumentRole, RequestStatus, VerificationRequest};
use crate::ocr::{recognize_front, DocumentType};
use crate::store::RecordStore;

pub struct VerificationEngine {
    capabilities: Capabilities,
    config: Config,
    blob_store: Arc<dyn BlobStore>,
    record_store: Arc<dyn RecordStore>,
}

impl VerificationEngine {
    pub fn new(
        capabilities: Capabilities,
        config: Config,
        blob_store: Arc<dyn BlobStore>,
        record_store: Arc<dyn RecordStore>,
    ) -> Self {
        Self { capabilities, config, blob_store, record_store }
    }

    #[instrument(skip(self))]
    pub async fn initialize(&self, subject_id: &str, tenant_id: &str) -> Result<VerificationRequest> {
        let request = VerificationRequest::new(subject_id, tenant_id, Utc::now());
        info!(request_id = %request.id, "request initialized");
        self.record_store.put(request.clone()).await?;
        Ok(request)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, request_id: Uuid) -> Result<VerificationRequest> {
        self.record_store
            .get(request_id)
            .await?
            .ok_or_else(|| VerificationError::input(format!("unknown request: {request_id}")))
    }

    #[instrument(skip(self, path))]
    pub async fn submit_front(&self, request_id: Uuid, path: &str, doc_type: DocumentType) -> Result<VerificationRequest> {
        let request = self.get(request_id).await?;
        require_status(&request, RequestStatus::Pending)?;

        let bytes = self.blob_store.download(path).await?;
        let mime = detect_mime(&bytes);
        let mut artifact = DocumentArtifact::new(path, DocumentRole::Front, mime, bytes.len() as u64);

        let outcome = self.run_front_ocr(&bytes, doc_type).await;
        let mut next = request.clone();

        match outcome {
            Ok(result) => {
                artifact.quality_score = Some(result.quality_score);
                artifact.extracted_fields = Some(result.fields.clone());
                next.ocr_fields = Some(result.fields);
                next.status = RequestStatus::FrontDocumentProcessed;
                info!(request_id = %request_id, "front document processed");
            }
            Err(err) if matches!(err, VerificationError::Transient(_)) => {
                return Err(err);
            }
            Err(err) => {
                warn!(request_id = %request_id, error = %err, "front OCR failed, terminal");
                next.status = RequestStatus::Failed;
                next.failure_reason = Some("Front OCR failed".to_string());
            }
        }
        next.front_artifact = Some(artifact);

        self.commit(next).await
    }

    async fn run_front_ocr(&self, bytes: &[u8], doc_type: DocumentType) -> Result<crate::ocr::FrontOcrResult> {
        let image = decode(bytes)?;
        recognize_front(&image, doc_type, self.capabilities.ocr.as_ref(), &self.config).await
    }

    #[instrument(skip(self, path))]
    pub async fn submit_back(&self, request_id: Uuid, path: &str) -> Result<VerificationRequest> {
        let request = self.get(request_id).await?;
        require_status(&request, RequestStatus::FrontDocumentProcessed)?;

        let bytes = self.blob_store.download(path).await?;
        let mime = detect_mime(&bytes);
        let image = decode(&bytes)?;
        let back_data = decode_back(
            &image,
            self.capabilities.barcode.as_ref(),
            self.capabilities.vision.as_ref(),
            self.capabilities.ocr.as_ref(),
            &self.config,
        )
        .await?;

        let mut artifact = DocumentArtifact::new(path, DocumentRole::Back, mime, bytes.len() as u64);
        artifact.extracted_fields = Some(back_data.merged.clone());

        let mut next = request.clone();
        next.back_artifact = Some(artifact);
        next.barcode_extraction_failed = back_data.barcode_extraction_failed();
        next.back_data = Some(back_data);
        next.status = RequestStatus::BackDocumentProcessed;

        info!(request_id = %request_id, barcode_extraction_failed = next.barcode_extraction_failed, "back document processed");
        self.commit(next).await
    }

    #[instrument(skip(self))]
    pub async fn cross_validate(&self, request_id: Uuid) -> Result<VerificationRequest> {
        let request = self.get(request_id).await?;
        require_status(&request, RequestStatus::BackDocumentProcessed)?;

        let front_fields = request
            .ocr_fields
            .clone()
            .ok_or_else(|| VerificationError::fatal("front_document_processed without ocr_fields"))?;
        let back_data = request
            .back_data
            .clone()
            .ok_or_else(|| VerificationError::fatal("back_document_processed without back_data"))?;

        let report = run_cross_validate(&front_fields, &back_data, &self.config);

        let mut next = request.clone();
        next.documents_match = report.overall_consistency;

        if !report.overall_consistency && !report.requires_manual_review {
            next.status = RequestStatus::Failed;
            next.failure_reason = Some("Front and back do not match the same person".to_string());
            next.documents_match = false;
        } else {
            next.status = RequestStatus::CrossValidationCompleted;
        }
        next.cross_validation_report = Some(report);

        info!(request_id = %request_id, status = ?next.status, "cross-validation completed");
        self.commit(next).await
    }

    #[instrument(skip(self, path))]
    pub async fn submit_live(&self, request_id: Uuid, path: &str) -> Result<VerificationRequest> {
        let request = self.get(request_id).await?;
        require_status(&request, RequestStatus::CrossValidationCompleted)?;

        let front_path = request
            .front_artifact
            .as_ref()
            .map(|a| a.logical_path.clone())
            .ok_or_else(|| VerificationError::fatal("cross_validation_completed without front artifact"))?;

        let (id_bytes, selfie_bytes) = tokio::join!(
            self.blob_store.download(&front_path),
            self.blob_store.download(path)
        );
        let selfie_bytes = selfie_bytes?;
        let mime = detect_mime(&selfie_bytes);
        let id_image = decode(&id_bytes?)?;
        let selfie_image = decode(&selfie_bytes)?;

        let report = biometric::compare(&id_image, &selfie_image, self.capabilities.face_detector.as_ref(), &self.config).await?;

        let mut next = request.clone();
        next.selfie_artifact = Some(DocumentArtifact::new(path, DocumentRole::Selfie, mime, selfie_bytes.len() as u64));
        next.face_passed = report.face_passed;
        next.liveness_passed = report.liveness_passed;
        next.biometric_report = Some(report);
        next.status = RequestStatus::LiveCaptureCompleted;

        info!(request_id = %request_id, face_passed = next.face_passed, liveness_passed = next.liveness_passed, "live capture completed");
        self.commit(next).await
    }

    #[instrument(skip(self))]
    pub async fn finalize(&self, request_id: Uuid) -> Result<VerificationRequest> {
        let request = self.get(request_id).await?;
        if request.status.is_terminal() {
            return Ok(request); // idempotent once terminal (testable property 3)
        }
        require_status(&request, RequestStatus::LiveCaptureCompleted)?;

        let requires_manual_review = request
            .cross_validation_report
            .as_ref()
            .map(|r| r.requires_manual_review)
            .unwrap_or(false);

        let mut next = request.clone();
        if request.barcode_extraction_failed || requires_manual_review {
            next.status = RequestStatus::ManualReview;
            next.manual_review_reason = request
                .cross_validation_report
                .as_ref()
                .and_then(|r| r.manual_review_reason.clone())
                .or_else(|| Some("Barcode extraction failed".to_string()));
        } else if !request.face_passed {
            next.status = RequestStatus::Failed;
            next.failure_reason = Some("Face matching failed".to_string());
        } else if !request.liveness_passed {
            next.status = RequestStatus::Failed;
            next.failure_reason = Some("Liveness failed".to_string());
        } else {
            next.status = RequestStatus::Verified;
        }

        info!(request_id = %request_id, status = ?next.status, "finalized");
        self.commit(next).await
    }

    #[instrument(skip(self))]
    pub async fn approve(&self, request_id: Uuid, reviewer_id: &str) -> Result<VerificationRequest> {
        self.admin_override(request_id, reviewer_id, RequestStatus::Verified, None).await
    }

    #[instrument(skip(self, reason))]
    pub async fn reject(&self, request_id: Uuid, reviewer_id: &str, reason: &str) -> Result<VerificationRequest> {
        self.admin_override(request_id, reviewer_id, RequestStatus::Failed, Some(reason.to_string())).await
    }

    async fn admin_override(
        &self,
        request_id: Uuid,
        reviewer_id: &str,
        target: RequestStatus,
        reason: Option<String>,
    ) -> Result<VerificationRequest> {
        let request = self.get(request_id).await?;
        if !request.status.is_terminal() {
            return Err(VerificationError::input(
                "admin override is only permitted on a terminal request",
            ));
        }

        let mut next = request.clone();
        next.status = target;
        match target {
            RequestStatus::Verified => {
                next.failure_reason = None;
                next.manual_review_reason = None;
            }
            RequestStatus::Failed => {
                next.failure_reason = Some(reason.unwrap_or_else(|| "admin rejection".to_string()));
                next.manual_review_reason = None;
            }
            _ => {}
        }

        info!(request_id = %request_id, reviewer_id, status = ?next.status, "admin override applied");
        self.commit(next).await
    }

    async fn commit(&self, mut next: VerificationRequest) -> Result<VerificationRequest> {
        next.current_step = next.status.current_step();
        next.updated_at = Utc::now();
        self.record_store.put(next.clone()).await?;
        Ok(next)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn require_status(request: &VerificationRequest, expected: RequestStatus) -> Result<()> {
    if request.status != expected {
        return Err(VerificationError::input(format!(
            "illegal transition: expected {:?}, found {:?}",
            expected, request.status
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::blobstore::InMemoryBlobStore;
    use crate::store::InMemoryRecordStore;

    fn make_engine() -> (VerificationEngine, Arc<InMemoryBlobStore>) {
        let blobs = Arc::new(InMemoryBlobStore::new());
        let engine = VerificationEngine::new(
            Capabilities::degraded(),
            Config::default(),
            blobs.clone(),
            Arc::new(InMemoryRecordStore::new()),
        );
        (engine, blobs)
    }

    fn tiny_jpeg_bytes() -> Vec<u8> {
        use image::{Rgb, RgbImage};
        use std::io::Cursor;
        let img = RgbImage::from_pixel(32, 32, Rgb([120, 130, 140]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn s6_illegal_transition_leaves_state_unchanged() {
        let (engine, blobs) = make_engine();
        blobs.put("selfie.jpg", tiny_jpeg_bytes());
        let request = engine.initialize("subject-1", "tenant-1").await.unwrap();

        let err = engine.submit_live(request.id, "selfie.jpg").await.unwrap_err();
        assert_eq!(err.category(), "input");

        let reloaded = engine.get(request.id).await.unwrap();
        assert_eq!(reloaded.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn front_ocr_with_noop_capability_still_advances_state() {
        let (engine, blobs) = make_engine();
        blobs.put("front.jpg", tiny_jpeg_bytes());
        let request = engine.initialize("subject-1", "tenant-1").await.unwrap();

        let updated = engine.submit_front(request.id, "front.jpg", DocumentType::Generic).await.unwrap();
        assert_eq!(updated.status, RequestStatus::FrontDocumentProcessed);
        assert!(updated.current_step >= request.current_step);
    }

    #[tokio::test]
    async fn finalize_is_idempotent_once_terminal() {
        let (engine, blobs) = make_engine();
        blobs.put("front.jpg", tiny_jpeg_bytes());
        blobs.put("back.jpg", tiny_jpeg_bytes());
        blobs.put("selfie.jpg", tiny_jpeg_bytes());

        let request = engine.initialize("subject-1", "tenant-1").await.unwrap();
        engine.submit_front(request.id, "front.jpg", DocumentType::Generic).await.unwrap();
        engine.submit_back(request.id, "back.jpg").await.unwrap();
        let after_cv = engine.cross_validate(request.id).await.unwrap();

        if after_cv.status == RequestStatus::Failed {
            return; // noop capabilities extract nothing; cross-validation's
                     // empty-extraction path routes to manual_review, not failure,
                     // but guard anyway for robustness.
        }

        engine.submit_live(request.id, "selfie.jpg").await.unwrap();
        let first = engine.finalize(request.id).await.unwrap();
        let second = engine.finalize(request.id).await.unwrap();
        assert_eq!(first.status, second.status);
    }
}
