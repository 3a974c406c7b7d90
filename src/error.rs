//! Crate-wide error taxonomy.
//!
//! Mirrors the seven categories in the verification pipeline design: a
//! caller-fault `InputError`, a soft `ExtractionFailure` that lets a step
//! complete with a flag set, the two terminal-failure categories
//! (`MismatchFailure`, `BiometricFailure`), `Transient` I/O/timeout errors
//! that never mutate state, and `Fatal` invariant violations that freeze
//! the request for operator intervention.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VerificationError>;

#[derive(Error, Debug, Clone)]
pub enum VerificationError {
    /// Caller fault: missing artifact, unsupported MIME, illegal state transition.
    #[error("input error: {0}")]
    InputError(String),

    /// Data absent or unreadable (OCR failed, PDF417 not decodable). Soft
    /// failure in every step except front OCR's unrecoverable decode path.
    #[error("extraction failure: {0}")]
    ExtractionFailure(String),

    /// Cross-validation found the front and back inconsistent.
    #[error("mismatch failure: {0}")]
    MismatchFailure(String),

    /// Face or liveness below threshold at finalize.
    #[error("biometric failure: {0}")]
    BiometricFailure(String),

    /// I/O, vision-model, or timeout error. Never mutates state; the
    /// caller may retry the same step idempotently.
    #[error("transient error: {0}")]
    Transient(String),

    /// Corrupted state record or invariant violation. State is frozen;
    /// requires operator intervention.
    #[error("fatal error: {0}")]
    Fatal(String),
}

impl VerificationError {
    pub fn input<S: Into<String>>(msg: S) -> Self {
        Self::InputError(msg.into())
    }

    pub fn extraction<S: Into<String>>(msg: S) -> Self {
        Self::ExtractionFailure(msg.into())
    }

    pub fn transient<S: Into<String>>(msg: S) -> Self {
        Self::Transient(msg.into())
    }

    pub fn fatal<S: Into<String>>(msg: S) -> Self {
        Self::Fatal(msg.into())
    }

    /// Category label for logging/metrics, mirroring the retrieved
    /// corpus's `ComplianceError::category()` convention.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InputError(_) => "input",
            Self::ExtractionFailure(_) => "extraction",
            Self::MismatchFailure(_) => "mismatch",
            Self::BiometricFailure(_) => "biometric",
            Self::Transient(_) => "transient",
            Self::Fatal(_) => "fatal",
        }
    }

    /// Transient errors never mutate state and the caller may retry the
    /// same step idempotently (spec.md §7).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<image::ImageError> for VerificationError {
    fn from(err: image::ImageError) -> Self {
        Self::ExtractionFailure(format!("image decode failed: {err}"))
    }
}

impl From<regex::Error> for VerificationError {
    fn from(err: regex::Error) -> Self {
        Self::Fatal(format!("invalid pattern: {err}"))
    }
}

impl From<std::io::Error> for VerificationError {
    fn from(err: std::io::Error) -> Self {
        Self::Transient(format!("io error: {err}"))
    }
}
