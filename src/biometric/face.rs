//! Face comparison (spec.md §4.5): weighted combination of pixel-space
//! metrics over a canonical 256x256 grayscale crop, with an optional
//! enhanced path once a face detector is wired in.

use image::{DynamicImage, GenericImageView, GrayImage};

use crate::capabilities::FaceDetector;
use crate::error::Result;
use crate::models::FaceSubscores;

use super::metrics::{
    center_window, contrast, cosine_similarity, edge_density, histogram, lbp_histogram,
    sharpness, texture_variance, to_canonical_gray, CANONICAL_SIZE,
};

fn raw_pixels(image: &GrayImage) -> Vec<f32> {
    image.pixels().map(|p| p.0[0] as f32 / 255.0).collect()
}

fn feature_vector(image: &GrayImage) -> Vec<f32> {
    let mut v = Vec::with_capacity(32 + 16 + 2);
    v.extend_from_slice(&histogram(image));
    v.extend_from_slice(&lbp_histogram(image));
    v.push(edge_density(image));
    v.push(texture_variance(image));
    v
}

fn multiscale_cosine(a: &GrayImage, b: &GrayImage) -> f32 {
    let scales = [64u32, 128, 256];
    let scores: Vec<f32> = scales
        .iter()
        .map(|&scale| {
            let ra = image::imageops::resize(a, scale, scale, image::imageops::FilterType::Triangle);
            let rb = image::imageops::resize(b, scale, scale, image::imageops::FilterType::Triangle);
            cosine_similarity(&raw_pixels(&ra), &raw_pixels(&rb))
        })
        .collect();
    scores.iter().sum::<f32>() / scores.len() as f32
}

fn quality_boost(a: &GrayImage, b: &GrayImage) -> f32 {
    let one_side = |img: &GrayImage| sharpness(img) * 0.4 + super::metrics::brightness_optimality(img) * 0.3 + contrast(img) * 0.3;
    let mean = (one_side(a) + one_side(b)) / 2.0;
    mean * 0.15
}

/// Baseline path: spec.md §4.5 weighted combination, no face detector.
pub fn compare_baseline(id_image: &DynamicImage, selfie: &DynamicImage) -> (f32, FaceSubscores) {
    let id_canon = to_canonical_gray(id_image, CANONICAL_SIZE);
    let selfie_canon = to_canonical_gray(selfie, CANONICAL_SIZE);

    let feature_similarity = cosine_similarity(&feature_vector(&id_canon), &feature_vector(&selfie_canon));

    let id_region = center_window(&id_canon, 0.6);
    let selfie_region = center_window(&selfie_canon, 0.6);
    let region_cosine = cosine_similarity(&raw_pixels(&id_region), &raw_pixels(&selfie_region));

    let multiscale = multiscale_cosine(&id_canon, &selfie_canon);
    let boost = quality_boost(&id_canon, &selfie_canon);

    let score = (feature_similarity * 0.25 + region_cosine * 0.25 + multiscale * 0.25 + boost).clamp(0.0, 1.0);

    let subscores = FaceSubscores {
        feature_similarity,
        region_cosine,
        multiscale_cosine: multiscale,
        quality_boost: boost,
        confidence: 0.5,
    };
    (score, subscores)
}

/// Enhanced path: face-detector crop, re-scored with structural /
/// histogram / edge / texture weights 0.30/0.25/0.25/0.20. Confidence is
/// derived from the variance of the four per-metric scores — lower
/// variance (the metrics agree) means higher confidence.
pub async fn compare_enhanced(
    id_image: &DynamicImage,
    selfie: &DynamicImage,
    detector: &dyn FaceDetector,
) -> Result<Option<(f32, FaceSubscores)>> {
    let id_box = detector.detect(id_image).await?;
    let selfie_box = detector.detect(selfie).await?;

    let (Some(id_box), Some(selfie_box)) = (id_box, selfie_box) else {
        return Ok(None);
    };

    let id_crop = id_image.view(id_box.x, id_box.y, id_box.width, id_box.height).to_image();
    let selfie_crop = selfie_image_crop(selfie, &selfie_box);

    let id_gray = to_canonical_gray(&DynamicImage::ImageRgba8(id_crop), CANONICAL_SIZE);
    let selfie_gray = to_canonical_gray(&selfie_crop, CANONICAL_SIZE);

    let structural = cosine_similarity(&raw_pixels(&id_gray), &raw_pixels(&selfie_gray));
    let hist = cosine_similarity(&histogram(&id_gray), &histogram(&selfie_gray));
    let edge = 1.0 - (edge_density(&id_gray) - edge_density(&selfie_gray)).abs();
    let texture = 1.0 - (texture_variance(&id_gray) - texture_variance(&selfie_gray)).abs();

    let score = (structural * 0.30 + hist * 0.25 + edge * 0.25 + texture * 0.20).clamp(0.0, 1.0);

    let metrics = [structural, hist, edge, texture];
    let mean = metrics.iter().sum::<f32>() / metrics.len() as f32;
    let variance = metrics.iter().map(|m| (m - mean).powi(2)).sum::<f32>() / metrics.len() as f32;
    let confidence = (1.0 - variance.sqrt()).clamp(0.0, 1.0);

    let subscores = FaceSubscores {
        feature_similarity: hist,
        region_cosine: structural,
        multiscale_cosine: (edge + texture) / 2.0,
        quality_boost: 0.0,
        confidence,
    };
    Ok(Some((score, subscores)))
}

fn selfie_image_crop(selfie: &DynamicImage, bbox: &crate::capabilities::FaceBox) -> DynamicImage {
    selfie.crop_imm(bbox.x, bbox.y, bbox.width, bbox.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn identical_images_score_near_one() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(300, 300, |x, y| {
            Rgb([((x * 3) % 255) as u8, ((y * 5) % 255) as u8, 120])
        }));
        let (score, _) = compare_baseline(&img, &img);
        assert!(score > 0.8, "score was {score}");
    }

    #[test]
    fn unrelated_images_score_lower_than_identical() {
        let solid_a = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([10, 10, 10])));
        let solid_b = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([240, 240, 240])));
        let (same, _) = compare_baseline(&solid_a, &solid_a);
        let (diff, _) = compare_baseline(&solid_a, &solid_b);
        assert!(same >= diff);
    }
}
