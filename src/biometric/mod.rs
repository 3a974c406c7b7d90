//! Biometric Comparator (spec.md §4.5): `compare_faces` and `liveness`,
//! composed into a `BiometricReport` by the engine.

pub mod face;
pub mod liveness;
pub mod metrics;

use image::DynamicImage;

use crate::capabilities::FaceDetector;
use crate::config::Config;
use crate::error::Result;
use crate::models::BiometricReport;

/// Runs both comparisons; the engine fetches the ID photo and selfie
/// concurrently before calling this (spec.md §5), so this function is
/// itself synchronous over already-decoded images except for the
/// optional face-detector call.
pub async fn compare(
    id_image: &DynamicImage,
    selfie: &DynamicImage,
    detector: &dyn FaceDetector,
    config: &Config,
) -> Result<BiometricReport> {
    let (face_similarity, face_subscores) = match face::compare_enhanced(id_image, selfie, detector).await? {
        Some((score, subscores)) => (score, subscores),
        None => face::compare_baseline(id_image, selfie),
    };
    let (liveness_score, liveness_subscores) = liveness::score_liveness(selfie, detector).await?;

    Ok(BiometricReport {
        face_similarity,
        liveness_score,
        face_passed: face_similarity >= config.face_match_threshold,
        liveness_passed: liveness_score >= config.liveness_threshold,
        face_subscores,
        liveness_subscores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::NoopFaceDetector;
    use image::{Rgb, RgbImage};

    #[tokio::test]
    async fn identical_images_pass_face_match() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(300, 300, |x, y| {
            Rgb([((x * 7) % 255) as u8, ((y * 11) % 255) as u8, 90])
        }));
        let report = compare(&img, &img, &NoopFaceDetector, &Config::default()).await.unwrap();
        assert!(report.face_passed);
    }
}
