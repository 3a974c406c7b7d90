//! Core entity types shared across the pipeline. Plain serde-derived
//! structs; no behavior lives here beyond small constructors and the
//! field-name enumeration, mirroring the teacher crate's `models::data`
//! convention of keeping the data model free of algorithmic logic.

pub mod biometric;
pub mod cross_validation;
pub mod document;
pub mod fields;
pub mod pdf417;
pub mod request;

pub use biometric::{BiometricReport, FaceSubscores, LivenessSubscores};
pub use cross_validation::CrossValidationReport;
pub use document::{DocumentArtifact, DocumentRole};
pub use fields::{FieldName, OcrFields};
pub use pdf417::{BackIdData, Pdf417Payload, ValidationTag};
pub use request::{RequestStatus, VerificationRequest};
