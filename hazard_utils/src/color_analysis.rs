//! Color Analyzer
//!
//! Strided HSV bucketing of RGB pixels. Buckets overlap: a pixel may count as
//! both dark and red, and each bucket is scored on its own ratio.
//!
//! Ratios are taken over `len / stride` (floor), not over the number of pixels
//! visited, so an image with fewer pixels than the stride scores 0.

use crate::config::ColorThresholds;
use crate::image_sampler::SampledImage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorProfile {
    /// Denominator of every ratio: `pixel count / stride`.
    pub sampled: usize,
    /// Pixels actually visited by the stride walk; `sampled` or `sampled + 1`.
    pub visited: usize,
    pub dark_ratio: f64,
    pub brown_ratio: f64,
    pub red_ratio: f64,
    pub gray_ratio: f64,
    pub orange_ratio: f64,
    pub score: u32,
}

/// RGB in `[0, 1]` to HSV with all three components in `[0, 1]`.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if min == max {
        return (0.0, 0.0, v);
    }
    let delta = max - min;
    let s = delta / max;
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), s, v)
}

pub fn analyze_colors(img: &SampledImage, t: &ColorThresholds) -> ColorProfile {
    let stride = t.sample_stride.max(1);
    let sampled = img.rgb.len() / stride;
    if sampled == 0 {
        tracing::debug!(
            pixels = img.rgb.len(),
            stride,
            "Image smaller than color stride, skipping"
        );
        return ColorProfile::default();
    }

    let mut visited = 0usize;
    let mut dark = 0usize;
    let mut brown = 0usize;
    let mut red = 0usize;
    let mut gray = 0usize;

    for &[r, g, b] in img.rgb.iter().step_by(stride) {
        visited += 1;
        let (h, s, v) = rgb_to_hsv(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);

        if v < t.dark_value {
            dark += 1;
        }
        if t.brown_hue.0 < h && h < t.brown_hue.1 && s > t.brown_saturation {
            brown += 1;
        }
        if (h < t.red_hue.0 || h > t.red_hue.1) && s > t.red_saturation {
            red += 1;
        }
        if s < t.gray_saturation && t.gray_value.0 < v && v < t.gray_value.1 {
            gray += 1;
        }
    }

    // Fire tones are judged in RGB directly, on a second pass over the same stride.
    let orange = img
        .rgb
        .iter()
        .step_by(stride)
        .filter(|&&[r, g, b]| {
            r > t.orange_min_red
                && g > t.orange_green.0
                && g < t.orange_green.1
                && b < t.orange_max_blue
        })
        .count();

    let ratio = |count: usize| count as f64 / sampled as f64;
    let mut profile = ColorProfile {
        sampled,
        visited,
        dark_ratio: ratio(dark),
        brown_ratio: ratio(brown),
        red_ratio: ratio(red),
        gray_ratio: ratio(gray),
        orange_ratio: ratio(orange),
        score: 0,
    };

    if profile.dark_ratio > t.dark_ratio {
        profile.score = profile.score.saturating_add(t.dark_weight);
    }
    if profile.brown_ratio > t.brown_ratio {
        profile.score = profile.score.saturating_add(t.brown_weight);
    }
    if profile.red_ratio > t.red_ratio {
        profile.score = profile.score.saturating_add(t.red_weight);
    }
    if profile.gray_ratio > t.gray_ratio {
        profile.score = profile.score.saturating_add(t.gray_weight);
    }
    if profile.orange_ratio > t.orange_ratio {
        profile.score = profile.score.saturating_add(t.orange_weight);
    }

    tracing::debug!(
        sampled,
        visited,
        dark = profile.dark_ratio,
        brown = profile.brown_ratio,
        red = profile.red_ratio,
        gray = profile.gray_ratio,
        orange = profile.orange_ratio,
        score = profile.score,
        "Color profile"
    );

    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_sampler::luma;

    const EPS: f64 = 1e-9;

    fn solid(width: u32, height: u32, px: [u8; 3]) -> SampledImage {
        from_pixels(width, height, vec![px; (width * height) as usize])
    }

    fn from_pixels(width: u32, height: u32, rgb: Vec<[u8; 3]>) -> SampledImage {
        let gray = rgb.iter().map(|&[r, g, b]| luma(r, g, b)).collect();
        SampledImage {
            width,
            height,
            rgb,
            gray,
        }
    }

    #[test]
    fn test_hsv_primaries() {
        let (h, s, v) = rgb_to_hsv(1.0, 0.0, 0.0);
        assert!(h.abs() < EPS && (s - 1.0).abs() < EPS && (v - 1.0).abs() < EPS);

        let (h, _, _) = rgb_to_hsv(0.0, 1.0, 0.0);
        assert!((h - 1.0 / 3.0).abs() < EPS);

        let (h, _, _) = rgb_to_hsv(0.0, 0.0, 1.0);
        assert!((h - 2.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_hsv_gray_has_no_hue() {
        assert_eq!(rgb_to_hsv(0.5, 0.5, 0.5), (0.0, 0.0, 0.5));
    }

    #[test]
    fn test_hsv_magenta_wraps_high() {
        // r is max, g < b, so raw hue is negative and wraps to 5/6.
        let (h, _, _) = rgb_to_hsv(1.0, 0.0, 1.0);
        assert!((h - 5.0 / 6.0).abs() < EPS);
        let (h, _, _) = rgb_to_hsv(1.0, 0.0, 0.1);
        assert!(h > 0.95);
    }

    #[test]
    fn test_red_bucket() {
        let profile = analyze_colors(&solid(30, 30, [200, 50, 50]), &ColorThresholds::default());
        assert_eq!(profile.red_ratio, 1.0);
        assert_eq!(profile.orange_ratio, 0.0);
        assert_eq!(profile.score, 25);
    }

    #[test]
    fn test_red_over_thirty_percent_scores() {
        // Every third sampled pixel red, the rest white.
        let rgb: Vec<[u8; 3]> = (0..30_000)
            .map(|i| if (i / 100) % 3 == 0 { [230, 10, 10] } else { [255, 255, 255] })
            .collect();
        let profile = analyze_colors(&from_pixels(300, 100, rgb), &ColorThresholds::default());
        assert_eq!(profile.sampled, 300);
        assert_eq!(profile.visited, 300);
        assert!((profile.red_ratio - 1.0 / 3.0).abs() < EPS);
        assert!(profile.score >= 25);
    }

    #[test]
    fn test_black_is_dark_only() {
        let profile = analyze_colors(&solid(10, 10, [0, 0, 0]), &ColorThresholds::default());
        assert_eq!(profile.dark_ratio, 1.0);
        assert_eq!(profile.gray_ratio, 0.0);
        assert_eq!(profile.score, 15);
    }

    #[test]
    fn test_mid_gray_bucket() {
        let profile = analyze_colors(&solid(10, 10, [128, 128, 128]), &ColorThresholds::default());
        assert_eq!(profile.gray_ratio, 1.0);
        assert_eq!(profile.score, 10);
    }

    #[test]
    fn test_brown_bucket() {
        // Hue ≈ 0.083, saturation 0.6
        let profile = analyze_colors(&solid(10, 10, [150, 105, 60]), &ColorThresholds::default());
        assert_eq!(profile.brown_ratio, 1.0);
        assert_eq!(profile.red_ratio, 0.0);
        assert_eq!(profile.score, 10);
    }

    #[test]
    fn test_orange_fire_pixels() {
        // (230, 110, 30): hue ≈ 0.067 and saturation 0.87 also land in brown.
        let profile = analyze_colors(&solid(20, 20, [230, 110, 30]), &ColorThresholds::default());
        assert_eq!(profile.orange_ratio, 1.0);
        assert_eq!(profile.brown_ratio, 1.0);
        assert_eq!(profile.score, 20 + 10);
    }

    #[test]
    fn test_max_score_is_eighty() {
        let t = ColorThresholds::default();
        let max = t.dark_weight + t.brown_weight + t.red_weight + t.gray_weight + t.orange_weight;
        assert_eq!(max, 80);
    }

    #[test]
    fn test_image_smaller_than_stride_scores_zero() {
        let profile = analyze_colors(&solid(9, 9, [200, 50, 50]), &ColorThresholds::default());
        assert_eq!(profile, ColorProfile::default());
        assert_eq!(profile.score, 0);
    }

    #[test]
    fn test_ratio_uses_floor_denominator() {
        // 150 pixels: indices 0 and 100 are visited, but the denominator is 1.
        let mut rgb = vec![[255, 255, 255]; 150];
        rgb[0] = [0, 0, 0];
        let profile = analyze_colors(&from_pixels(150, 1, rgb), &ColorThresholds::default());
        assert_eq!(profile.sampled, 1);
        assert_eq!(profile.visited, 2);
        assert_eq!(profile.dark_ratio, 1.0);
        assert_eq!(profile.score, 15);
    }

    #[test]
    fn test_empty_buffer_scores_zero() {
        let img = from_pixels(0, 0, Vec::new());
        assert_eq!(analyze_colors(&img, &ColorThresholds::default()), ColorProfile::default());
    }
}
