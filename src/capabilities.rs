//! Optional-dependency capability traits (Design Notes: "Graceful
//! optional dependencies"). Each capability is wired at construction
//! time via a `Capabilities` bundle; a missing capability is a `Noop`
//! implementation, never a runtime branch in a hot path. Grounded on the
//! `OcrBackend` trait-plus-availability-check pattern from the retrieved
//! corpus's OCR backend abstraction, simplified to the single-backend
//! shape this pipeline needs.

use async_trait::async_trait;
use image::DynamicImage;

use crate::error::Result;

/// Recognizes text from a preprocessed raster image.
#[async_trait]
pub trait Ocr: Send + Sync {
    async fn recognize(&self, image: &DynamicImage, whitelist: &str, psm_auto: bool) -> Result<OcrOutput>;
}

#[derive(Debug, Clone, Default)]
pub struct OcrOutput {
    pub text: String,
    pub mean_confidence: f32,
}

/// A `Noop` OCR backend: fails closed with empty text and zero
/// confidence rather than guessing. Every downstream consumer must treat
/// an empty `OcrOutput` as an extraction failure, never a pass.
pub struct NoopOcr;

#[async_trait]
impl Ocr for NoopOcr {
    async fn recognize(&self, _image: &DynamicImage, _whitelist: &str, _psm_auto: bool) -> Result<OcrOutput> {
        Ok(OcrOutput::default())
    }
}

/// Decodes a PDF417 (or other stacked 2D) barcode from a raster image.
#[async_trait]
pub trait Barcode: Send + Sync {
    async fn decode_pdf417(&self, image: &DynamicImage) -> Result<Option<String>>;
}

pub struct NoopBarcode;

#[async_trait]
impl Barcode for NoopBarcode {
    async fn decode_pdf417(&self, _image: &DynamicImage) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Locates a face bounding box within an image, used by the enhanced
/// biometric path and by liveness's face-in-circle gate.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    async fn detect(&self, image: &DynamicImage) -> Result<Option<FaceBox>>;
}

#[derive(Debug, Clone, Copy)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub struct NoopFaceDetector;

#[async_trait]
impl FaceDetector for NoopFaceDetector {
    async fn detect(&self, _image: &DynamicImage) -> Result<Option<FaceBox>> {
        Ok(None)
    }
}

/// External multi-modal model, used for AI OCR / AI PDF417 when
/// configured (spec.md §6). Optional in every call site.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn ask_pdf417_payload(&self, image: &DynamicImage) -> Result<Option<VisionPdf417Answer>>;
}

#[derive(Debug, Clone)]
pub struct VisionPdf417Answer {
    pub found: bool,
    pub payload: String,
    pub confidence: f32,
}

pub struct NoopVisionModel;

#[async_trait]
impl VisionModel for NoopVisionModel {
    async fn ask_pdf417_payload(&self, _image: &DynamicImage) -> Result<Option<VisionPdf417Answer>> {
        Ok(None)
    }
}

/// The capability bundle the Engine is constructed with. Missing
/// capabilities are filled with their `Noop` implementation by
/// `Capabilities::degraded` so call sites never need an `Option` check.
pub struct Capabilities {
    pub ocr: Box<dyn Ocr>,
    pub barcode: Box<dyn Barcode>,
    pub face_detector: Box<dyn FaceDetector>,
    pub vision: Box<dyn VisionModel>,
}

impl Capabilities {
    /// All-`Noop` bundle, used by tests and anywhere the pipeline must
    /// run deterministically without real backends.
    pub fn degraded() -> Self {
        Self {
            ocr: Box::new(NoopOcr),
            barcode: Box::new(NoopBarcode),
            face_detector: Box::new(NoopFaceDetector),
            vision: Box::new(NoopVisionModel),
        }
    }

    /// Wires the real backend for every feature compiled in, falling
    /// back to the `Noop` implementation for the ones that weren't.
    pub fn real() -> Self {
        Self {
            #[cfg(feature = "ocr")]
            ocr: Box::new(TesseractOcr),
            #[cfg(not(feature = "ocr"))]
            ocr: Box::new(NoopOcr),
            #[cfg(feature = "barcode")]
            barcode: Box::new(crate::backid::pdf417::RxingBarcode),
            #[cfg(not(feature = "barcode"))]
            barcode: Box::new(NoopBarcode),
            face_detector: Box::new(NoopFaceDetector),
            vision: Box::new(NoopVisionModel),
        }
    }
}

/// Real OCR backend over the `tesseract` FFI bindings. The synchronous
/// FFI call runs inside `spawn_blocking` since `Tesseract` is not `Send`
/// across an `.await` point otherwise.
#[cfg(feature = "ocr")]
pub struct TesseractOcr;

#[cfg(feature = "ocr")]
#[async_trait]
impl Ocr for TesseractOcr {
    async fn recognize(&self, image: &DynamicImage, whitelist: &str, psm_auto: bool) -> Result<OcrOutput> {
        let image = image.clone();
        let whitelist = whitelist.to_string();
        tokio::task::spawn_blocking(move || run_tesseract(&image, &whitelist, psm_auto))
            .await
            .map_err(|e| crate::error::VerificationError::extraction(format!("tesseract task panicked: {e}")))?
    }
}

#[cfg(feature = "ocr")]
fn run_tesseract(image: &DynamicImage, whitelist: &str, psm_auto: bool) -> Result<OcrOutput> {
    use tesseract::{PageSegMode, Tesseract};

    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .map_err(|e| crate::error::VerificationError::extraction(format!("tempfile create failed: {e}")))?;
    image
        .save_with_format(file.path(), image::ImageFormat::Png)
        .map_err(|e| crate::error::VerificationError::extraction(format!("tempfile write failed: {e}")))?;
    let path = file
        .path()
        .to_str()
        .ok_or_else(|| crate::error::VerificationError::extraction("non-utf8 temp path".to_string()))?;

    let mut tess = Tesseract::new(None, Some("eng"))
        .map_err(|e| crate::error::VerificationError::extraction(format!("tesseract init failed: {e}")))?
        .set_variable("tessedit_char_whitelist", whitelist)
        .map_err(|e| crate::error::VerificationError::extraction(format!("tesseract config failed: {e}")))?;

    tess.set_page_seg_mode(if psm_auto { PageSegMode::PsmAuto } else { PageSegMode::PsmSingleBlock });

    let mut tess = tess
        .set_image(path)
        .map_err(|e| crate::error::VerificationError::extraction(format!("tesseract set_image failed: {e}")))?;

    let text = tess
        .get_text()
        .map_err(|e| crate::error::VerificationError::extraction(format!("tesseract recognize failed: {e}")))?;
    let mean_confidence = (tess.mean_text_conf() as f32 / 100.0).clamp(0.0, 1.0);

    Ok(OcrOutput { text, mean_confidence })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_ocr_fails_closed() {
        let ocr = NoopOcr;
        let img = DynamicImage::new_rgb8(10, 10);
        let out = ocr.recognize(&img, "", false).await.unwrap();
        assert!(out.text.is_empty());
        assert_eq!(out.mean_confidence, 0.0);
    }

    #[tokio::test]
    async fn noop_barcode_returns_none() {
        let barcode = NoopBarcode;
        let img = DynamicImage::new_rgb8(10, 10);
        assert!(barcode.decode_pdf417(&img).await.unwrap().is_none());
    }
}
