//! Document OCR (spec.md §4.2): front-of-ID field extraction, date
//! normalization, and the separate validation operation exposed over
//! the extracted fields.

pub mod dates;
pub mod front;
pub mod patterns;

pub use front::{recognize_front, validate_front, FrontOcrResult, FrontValidation};
pub use patterns::DocumentType;
