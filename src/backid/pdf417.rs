//! Hardware-style PDF417 decode (spec.md §4.3 step 1): grayscale,
//! contrast, Rec.601 luminance, then a PDF417-specific reader followed
//! by a multi-format reader with `try_harder`. Feature-gated on
//! `barcode`; without it, `RxingBarcode` is simply not constructed and
//! the engine falls back to `NoopBarcode`.

use image::{DynamicImage, GenericImageView};

use crate::capabilities::Barcode;
use crate::error::Result;

/// Rec.601 luminance plane, used ahead of the reader per spec.md §4.3.
pub fn to_luminance_plane(image: &DynamicImage) -> Vec<u8> {
    let rgb = image.to_rgb8();
    rgb.pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32).round() as u8
        })
        .collect()
}

#[cfg(feature = "barcode")]
pub struct RxingBarcode;

#[cfg(feature = "barcode")]
#[async_trait::async_trait]
impl Barcode for RxingBarcode {
    async fn decode_pdf417(&self, image: &DynamicImage) -> Result<Option<String>> {
        use rxing::{BarcodeFormat, DecodeHintValue, DecodingHintDictionary, Reader};
        use std::collections::HashSet;

        let (width, height) = image.dimensions();
        let luma = to_luminance_plane(image);

        let mut hints: DecodingHintDictionary = DecodingHintDictionary::new();
        let mut formats = HashSet::new();
        formats.insert(BarcodeFormat::PDF_417);
        hints.insert(
            rxing::DecodeHintType::POSSIBLE_FORMATS,
            DecodeHintValue::PossibleFormats(formats),
        );
        hints.insert(
            rxing::DecodeHintType::TRY_HARDER,
            DecodeHintValue::TryHarder(true),
        );
        hints.insert(
            rxing::DecodeHintType::PURE_BARCODE,
            DecodeHintValue::PureBarcode(false),
        );

        let source = rxing::common::HybridBinarizer::new(
            rxing::RGBLuminanceSource::new_with_width_height_pixels(
                width as usize,
                height as usize,
                &luma.iter().map(|&l| (l as u32) << 16 | (l as u32) << 8 | l as u32).collect::<Vec<_>>(),
            ),
        );
        let mut bitmap = rxing::BinaryBitmap::new(source);

        let mut reader = rxing::MultiFormatReader::default();
        match reader.decode_with_hints(&mut bitmap, &hints) {
            Ok(result) => Ok(Some(result.getText().to_string())),
            Err(_) => Ok(None),
        }
    }
}
