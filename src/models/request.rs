use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::biometric::BiometricReport;
use super::cross_validation::CrossValidationReport;
use super::document::DocumentArtifact;
use super::fields::OcrFields;
use super::pdf417::BackIdData;

/// The Engine's state machine, spec.md §4.6. Variants are listed in
/// pipeline order; `current_step()` gives the monotone step number used
/// to enforce invariant 2 (current_step never decreases).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    FrontDocumentProcessing,
    FrontDocumentProcessed,
    BackDocumentProcessing,
    BackDocumentProcessed,
    CrossValidationProcessing,
    CrossValidationCompleted,
    LiveCaptureProcessing,
    LiveCaptureCompleted,
    Verified,
    Failed,
    ManualReview,
}

impl RequestStatus {
    pub fn current_step(&self) -> u8 {
        match self {
            RequestStatus::Pending => 1,
            RequestStatus::FrontDocumentProcessing | RequestStatus::FrontDocumentProcessed => 2,
            RequestStatus::BackDocumentProcessing | RequestStatus::BackDocumentProcessed => 3,
            RequestStatus::CrossValidationProcessing
            | RequestStatus::CrossValidationCompleted => 4,
            RequestStatus::LiveCaptureProcessing | RequestStatus::LiveCaptureCompleted => 5,
            RequestStatus::Verified | RequestStatus::Failed | RequestStatus::ManualReview => 6,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Verified | RequestStatus::Failed | RequestStatus::ManualReview
        )
    }
}

/// One run of the verification pipeline for one subject. Created by the
/// Engine on `initialize`; mutated only by the Engine, and only by
/// committing a fully-formed replacement record (spec.md §5 ordering
/// guarantee — never an in-place partial field update).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub id: Uuid,
    pub subject_id: String,
    pub tenant_id: String,
    pub status: RequestStatus,
    pub current_step: u8,

    pub front_artifact: Option<DocumentArtifact>,
    pub back_artifact: Option<DocumentArtifact>,
    pub selfie_artifact: Option<DocumentArtifact>,

    pub ocr_fields: Option<OcrFields>,
    pub back_data: Option<BackIdData>,
    pub cross_validation_report: Option<CrossValidationReport>,
    pub biometric_report: Option<BiometricReport>,

    pub barcode_extraction_failed: bool,
    pub documents_match: bool,
    pub face_passed: bool,
    pub liveness_passed: bool,

    pub manual_review_reason: Option<String>,
    pub failure_reason: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VerificationRequest {
    pub fn new(subject_id: impl Into<String>, tenant_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id: subject_id.into(),
            tenant_id: tenant_id.into(),
            status: RequestStatus::Pending,
            current_step: RequestStatus::Pending.current_step(),
            front_artifact: None,
            back_artifact: None,
            selfie_artifact: None,
            ocr_fields: None,
            back_data: None,
            cross_validation_report: None,
            biometric_report: None,
            barcode_extraction_failed: false,
            documents_match: false,
            face_passed: false,
            liveness_passed: false,
            manual_review_reason: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Invariant 1 (spec.md §8): exactly one terminal reason populated iff
    /// the request is non-verified and terminal.
    pub fn terminal_reason_consistent(&self) -> bool {
        match self.status {
            RequestStatus::Verified => {
                self.failure_reason.is_none() && self.manual_review_reason.is_none()
            }
            RequestStatus::Failed => self.failure_reason.is_some(),
            RequestStatus::ManualReview => self.manual_review_reason.is_some(),
            _ => true,
        }
    }
}
