//! Back-ID Decoder (spec.md §4.3): PDF417 decode, vision-model
//! fallback, OCR fallback, AAMVA field parsing, and BackIdData
//! composition.

pub mod aamva;
pub mod decoder;
pub mod pdf417;

pub use aamva::parse_aamva;
pub use decoder::decode_back;
