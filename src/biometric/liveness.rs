//! Passive liveness scoring (spec.md §4.5): five weighted indicators,
//! gated by a face-in-circle check. No randomness anywhere — a missing
//! face detector falls back to skin-hue/dark-region/symmetry heuristics,
//! never a random number (Design Notes: "Randomness in biometric
//! fallbacks... is a security bug").

use image::{DynamicImage, GenericImageView, GrayImage, Rgba};

use crate::capabilities::FaceDetector;
use crate::error::Result;
use crate::models::LivenessSubscores;

use super::metrics::{edge_density, texture_variance};

const FACE_IN_CIRCLE_GATE: f32 = 0.5;

pub async fn score_liveness(selfie: &DynamicImage, detector: &dyn FaceDetector) -> Result<(f32, LivenessSubscores)> {
    let face_in_circle = face_in_circle_score(selfie, detector).await?;

    if face_in_circle < FACE_IN_CIRCLE_GATE {
        let subscores = LivenessSubscores {
            face_in_circle,
            resolution_adequacy: 0.0,
            color_richness: 0.0,
            lighting_naturalness: 0.0,
            texture_complexity: 0.0,
            edge_sharpness: 0.0,
        };
        return Ok((face_in_circle * 0.30, subscores));
    }

    let resolution_adequacy = resolution_adequacy_score(selfie);
    let color_richness = color_richness_score(selfie);
    let lighting_naturalness = lighting_naturalness_score(selfie);
    let gray = selfie.to_luma8();
    let texture_complexity = texture_variance(&gray);
    let edge_sharpness = edge_density(&gray);

    let score = (face_in_circle * 0.30
        + resolution_adequacy * 0.20
        + color_richness * 0.20
        + lighting_naturalness * 0.25
        + texture_complexity * 0.20
        + edge_sharpness * 0.20)
        .clamp(0.0, 1.0);

    let subscores = LivenessSubscores {
        face_in_circle,
        resolution_adequacy,
        color_richness,
        lighting_naturalness,
        texture_complexity,
        edge_sharpness,
    };
    Ok((score, subscores))
}

async fn face_in_circle_score(selfie: &DynamicImage, detector: &dyn FaceDetector) -> Result<f32> {
    let (w, h) = selfie.dimensions();
    let radius = 0.35 * w.min(h) as f32;
    let center = (w as f32 / 2.0, h as f32 / 2.0);

    if let Some(face) = detector.detect(selfie).await? {
        let face_center = (
            face.x as f32 + face.width as f32 / 2.0,
            face.y as f32 + face.height as f32 / 2.0,
        );
        let dist = ((face_center.0 - center.0).powi(2) + (face_center.1 - center.1).powi(2)).sqrt();
        return Ok((1.0 - (dist / radius).min(1.0)).clamp(0.0, 1.0));
    }

    Ok(skin_symmetry_fallback(selfie))
}

/// Traditional fallback: skin-hue ratio within the center circle plus
/// left/right symmetry, per spec.md §4.5's fallback heuristic.
fn skin_symmetry_fallback(selfie: &DynamicImage) -> f32 {
    let (w, h) = selfie.dimensions();
    let radius = 0.35 * w.min(h) as f32;
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let rgba = selfie.to_rgba8();

    let mut skin_pixels = 0u32;
    let mut total = 0u32;
    for y in 0..h {
        for x in 0..w {
            let dist = (((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2))).sqrt();
            if dist <= radius {
                total += 1;
                if is_skin_tone(rgba.get_pixel(x, y)) {
                    skin_pixels += 1;
                }
            }
        }
    }
    if total == 0 {
        return 0.0;
    }
    let ratio = skin_pixels as f32 / total as f32;
    let skin_score = if (0.15..=0.70).contains(&ratio) { 1.0 } else { 0.0 };

    let symmetry_score = left_right_symmetry(selfie);
    (skin_score * 0.6 + symmetry_score * 0.4).clamp(0.0, 1.0)
}

fn is_skin_tone(pixel: &Rgba<u8>) -> bool {
    let [r, g, b, _] = pixel.0;
    let (r, g, b) = (r as i32, g as i32, b as i32);
    r > 95 && g > 40 && b > 20 && r > g && r > b && (r - g).abs() > 15
}

fn left_right_symmetry(image: &DynamicImage) -> f32 {
    let gray = image.to_luma8();
    let (w, h) = gray.dimensions();
    if w < 2 {
        return 0.0;
    }
    let half = w / 2;
    let mut diff_sum = 0f32;
    let mut count = 0u32;
    for y in 0..h {
        for x in 0..half {
            let left = gray.get_pixel(x, y).0[0] as f32;
            let right = gray.get_pixel(w - 1 - x, y).0[0] as f32;
            diff_sum += (left - right).abs();
            count += 1;
        }
    }
    let mean_diff = diff_sum / count.max(1) as f32;
    (1.0 - mean_diff / 255.0).clamp(0.0, 1.0)
}

fn resolution_adequacy_score(image: &DynamicImage) -> f32 {
    let (w, h) = image.dimensions();
    let area = (w.min(h)) as f32;
    if area < 300.0 {
        0.2
    } else if area >= 800.0 {
        0.9
    } else {
        0.2 + (area - 300.0) / (800.0 - 300.0) * 0.7
    }
}

fn color_richness_score(image: &DynamicImage) -> f32 {
    let rgb = image.to_rgb8();
    let mut buckets = std::collections::HashSet::new();
    for px in rgb.pixels() {
        let quantized = (px.0[0] / 16, px.0[1] / 16, px.0[2] / 16);
        buckets.insert(quantized);
    }
    let samples = rgb.pixels().count().max(1) as f32;
    (buckets.len() as f32 / samples * 50.0).clamp(0.0, 1.0)
}

/// Rewards a moderate standard deviation of per-region brightness over a
/// 4x4 grid (0.05-0.30 band is "naturalistic" per spec.md §4.5).
fn lighting_naturalness_score(image: &DynamicImage) -> f32 {
    let gray: GrayImage = image.to_luma8();
    let (w, h) = gray.dimensions();
    let (gw, gh) = (w / 4, h / 4);
    if gw == 0 || gh == 0 {
        return 0.0;
    }
    let mut region_means = Vec::with_capacity(16);
    for gy in 0..4 {
        for gx in 0..4 {
            let mut sum = 0u64;
            let mut count = 0u64;
            for y in gy * gh..((gy + 1) * gh).min(h) {
                for x in gx * gw..((gx + 1) * gw).min(w) {
                    sum += gray.get_pixel(x, y).0[0] as u64;
                    count += 1;
                }
            }
            if count > 0 {
                region_means.push(sum as f32 / count as f32 / 255.0);
            }
        }
    }
    if region_means.is_empty() {
        return 0.0;
    }
    let mean = region_means.iter().sum::<f32>() / region_means.len() as f32;
    let variance = region_means.iter().map(|m| (m - mean).powi(2)).sum::<f32>() / region_means.len() as f32;
    let std_dev = variance.sqrt();
    if (0.05..=0.30).contains(&std_dev) {
        1.0
    } else if std_dev < 0.05 {
        std_dev / 0.05
    } else {
        (1.0 - (std_dev - 0.30) / 0.30).clamp(0.0, 1.0)
    }
}
