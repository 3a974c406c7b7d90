//! Image Gateway (spec.md §4.1): fetches a byte blob for a logical path,
//! classifies its MIME type from magic bytes, decodes it to a raster
//! image, and preprocesses it for OCR or barcode scanning.

pub mod blobstore;
pub mod image_ops;
pub mod mime;

pub use blobstore::BlobStore;
pub use image_ops::{decode, preprocess_for_barcode, preprocess_for_ocr};
pub use mime::detect_mime;
