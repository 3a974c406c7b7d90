//! Pixel-space similarity and quality metrics shared by face comparison
//! and liveness scoring (spec.md §4.5). These are plain numeric helpers
//! over `image::GrayImage`, grounded on the `imageproc`-based processing
//! style the teacher crate uses for its (faked) security-feature checks
//! — here the math is real rather than a hardcoded boolean.

use image::{DynamicImage, GenericImageView, GrayImage};

pub const CANONICAL_SIZE: u32 = 256;

/// Resize to a canonical square grayscale region, center-crop assumed
/// (spec.md §4.5: "formal face detection is a best-effort enhancement
/// path").
pub fn to_canonical_gray(image: &DynamicImage, size: u32) -> GrayImage {
    let gray = image.grayscale();
    let (w, h) = gray.dimensions();
    let side = w.min(h);
    let x0 = (w - side) / 2;
    let y0 = (h - side) / 2;
    let cropped = gray.crop_imm(x0, y0, side, side);
    cropped.resize_exact(size, size, image::imageops::FilterType::Triangle).to_luma8()
}

/// Crop the center `fraction` window (e.g. 0.6 = center 60%).
pub fn center_window(image: &GrayImage, fraction: f32) -> GrayImage {
    let (w, h) = image.dimensions();
    let nw = (w as f32 * fraction).round().max(1.0) as u32;
    let nh = (h as f32 * fraction).round().max(1.0) as u32;
    let x0 = (w - nw) / 2;
    let y0 = (h - nh) / 2;
    image::imageops::crop_imm(image, x0, y0, nw, nh).to_image()
}

/// Normalized 32-bucket grayscale histogram.
pub fn histogram(image: &GrayImage) -> [f32; 32] {
    let mut buckets = [0u32; 32];
    for px in image.pixels() {
        let bucket = (px.0[0] as usize * 32) / 256;
        buckets[bucket.min(31)] += 1;
    }
    let total = image.pixels().count().max(1) as f32;
    let mut hist = [0f32; 32];
    for i in 0..32 {
        hist[i] = buckets[i] as f32 / total;
    }
    hist
}

/// Coarse local binary pattern histogram (8-neighborhood, 1px radius),
/// bucketed into 16 bins by the count of "brighter than center"
/// neighbors — a cheap LBP analogue, not the full rotation-invariant
/// uniform-pattern LBP.
pub fn lbp_histogram(image: &GrayImage) -> [f32; 16] {
    let (w, h) = image.dimensions();
    let mut bins = [0u32; 16];
    let mut count = 0u32;
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let center = image.get_pixel(x, y).0[0];
            let neighbors = [
                image.get_pixel(x - 1, y - 1).0[0],
                image.get_pixel(x, y - 1).0[0],
                image.get_pixel(x + 1, y - 1).0[0],
                image.get_pixel(x + 1, y).0[0],
                image.get_pixel(x + 1, y + 1).0[0],
                image.get_pixel(x, y + 1).0[0],
                image.get_pixel(x - 1, y + 1).0[0],
                image.get_pixel(x - 1, y).0[0],
            ];
            let brighter = neighbors.iter().filter(|&&n| n > center).count();
            bins[brighter.min(15)] += 1;
            count += 1;
        }
    }
    let total = count.max(1) as f32;
    let mut hist = [0f32; 16];
    for i in 0..16 {
        hist[i] = bins[i] as f32 / total;
    }
    hist
}

/// Sobel-like edge density: fraction of pixels whose local gradient
/// magnitude exceeds a fixed threshold.
pub fn edge_density(image: &GrayImage) -> f32 {
    let (w, h) = image.dimensions();
    if w < 3 || h < 3 {
        return 0.0;
    }
    let mut edge_count = 0u32;
    let mut total = 0u32;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let gx = image.get_pixel(x + 1, y).0[0] as i32 - image.get_pixel(x - 1, y).0[0] as i32;
            let gy = image.get_pixel(x, y + 1).0[0] as i32 - image.get_pixel(x, y - 1).0[0] as i32;
            let magnitude = ((gx * gx + gy * gy) as f32).sqrt();
            if magnitude > 30.0 {
                edge_count += 1;
            }
            total += 1;
        }
    }
    edge_count as f32 / total.max(1) as f32
}

/// Local-variance texture score: mean per-8x8-block variance, normalized.
pub fn texture_variance(image: &GrayImage) -> f32 {
    let (w, h) = image.dimensions();
    let block = 8;
    let mut variances = Vec::new();
    let mut y = 0;
    while y + block <= h {
        let mut x = 0;
        while x + block <= w {
            let mut sum = 0f32;
            let mut sum_sq = 0f32;
            let n = (block * block) as f32;
            for by in y..y + block {
                for bx in x..x + block {
                    let v = image.get_pixel(bx, by).0[0] as f32;
                    sum += v;
                    sum_sq += v * v;
                }
            }
            let mean = sum / n;
            let variance = (sum_sq / n - mean * mean).max(0.0);
            variances.push(variance);
            x += block;
        }
        y += block;
    }
    if variances.is_empty() {
        return 0.0;
    }
    let mean_variance = variances.iter().sum::<f32>() / variances.len() as f32;
    (mean_variance / 4096.0).clamp(0.0, 1.0)
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na * nb)).clamp(-1.0, 1.0)
}

/// Average pixel intensity, 0..1.
pub fn brightness(image: &GrayImage) -> f32 {
    let sum: u64 = image.pixels().map(|p| p.0[0] as u64).sum();
    sum as f32 / (image.pixels().count().max(1) as f32 * 255.0)
}

/// 1.0 at perfectly mid-gray brightness (0.5), falling off linearly.
pub fn brightness_optimality(image: &GrayImage) -> f32 {
    1.0 - (brightness(image) - 0.5).abs() * 2.0
}

/// Standard deviation of pixel intensities, 0..1 normalized.
pub fn contrast(image: &GrayImage) -> f32 {
    let values: Vec<f32> = image.pixels().map(|p| p.0[0] as f32).collect();
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32;
    (variance.sqrt() / 128.0).clamp(0.0, 1.0)
}

/// Sharpness proxy: mean edge magnitude normalized into [0, 1].
pub fn sharpness(image: &GrayImage) -> f32 {
    edge_density(image)
}
