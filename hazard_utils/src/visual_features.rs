//! Visual Feature Analyzer
//!
//! Grayscale statistics that tend to rise on damaged surfaces: share of dark
//! pixels, overall intensity variance and one-step gradient edge density.

use crate::config::VisualThresholds;
use crate::errors::{ClassifyError, Result};
use crate::image_sampler::SampledImage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualFeatures {
    pub dark_ratio: f64,
    pub variance: f64,
    pub edge_density: f64,
    pub score: u32,
}

pub fn analyze_visual_features(
    img: &SampledImage,
    thresholds: &VisualThresholds,
) -> Result<VisualFeatures> {
    if img.gray.is_empty() {
        return Err(ClassifyError::Computation(
            "empty grayscale buffer".to_string(),
        ));
    }

    let total = img.gray.len() as f64;
    let dark = img
        .gray
        .iter()
        .filter(|&&p| p < thresholds.dark_intensity)
        .count();
    let dark_ratio = dark as f64 / total;
    let variance = population_variance(&img.gray);
    let edge_density = edge_density(img, thresholds.edge_step);

    let mut score: u32 = 0;
    if dark_ratio > thresholds.dark_ratio {
        score = score.saturating_add(thresholds.dark_weight);
    }
    if variance > thresholds.variance {
        score = score.saturating_add(thresholds.variance_weight);
    }
    if edge_density > thresholds.edge_density {
        score = score.saturating_add(thresholds.edge_weight);
    }

    tracing::debug!(dark_ratio, variance, edge_density, score, "Visual features");

    Ok(VisualFeatures {
        dark_ratio,
        variance,
        edge_density,
        score,
    })
}

pub fn population_variance(pixels: &[u8]) -> f64 {
    if pixels.is_empty() {
        return 0.0;
    }
    let n = pixels.len() as f64;
    let mean = pixels.iter().map(|&p| p as f64).sum::<f64>() / n;
    pixels
        .iter()
        .map(|&p| {
            let d = p as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Fraction of interior pixels whose left/right or top/bottom neighbours
/// differ by more than `step`. Images narrower or shorter than 3 pixels have
/// no interior and yield 0.
pub fn edge_density(img: &SampledImage, step: u8) -> f64 {
    if img.width < 3 || img.height < 3 {
        return 0.0;
    }

    let step = step as i16;
    let mut edges = 0usize;
    let mut interior = 0usize;

    for y in 1..img.height - 1 {
        for x in 1..img.width - 1 {
            let h = img.gray_at(x + 1, y) as i16 - img.gray_at(x - 1, y) as i16;
            let v = img.gray_at(x, y + 1) as i16 - img.gray_at(x, y - 1) as i16;
            if h.abs() > step || v.abs() > step {
                edges += 1;
            }
            interior += 1;
        }
    }

    edges as f64 / interior as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_sampler::luma;

    fn gray_image(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> SampledImage {
        let mut rgb = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = f(x, y);
                rgb.push([v, v, v]);
            }
        }
        let gray = rgb.iter().map(|&[r, g, b]| luma(r, g, b)).collect();
        SampledImage {
            width,
            height,
            rgb,
            gray,
        }
    }

    #[test]
    fn test_all_black_scores_dark() {
        let img = gray_image(40, 40, |_, _| 0);
        let features = analyze_visual_features(&img, &VisualThresholds::default()).unwrap();
        assert_eq!(features.dark_ratio, 1.0);
        assert!(features.score >= 25);
    }

    #[test]
    fn test_uniform_image_has_no_variance_or_edges() {
        let img = gray_image(40, 40, |_, _| 180);
        let features = analyze_visual_features(&img, &VisualThresholds::default()).unwrap();
        assert_eq!(features.variance, 0.0);
        assert_eq!(features.edge_density, 0.0);
        assert_eq!(features.score, 0);
    }

    #[test]
    fn test_horizontal_stripes_dark_and_variance() {
        // Alternating black and white rows.
        let img = gray_image(20, 20, |_, y| if y % 2 == 0 { 0 } else { 255 });
        let features = analyze_visual_features(&img, &VisualThresholds::default()).unwrap();
        assert_eq!(features.dark_ratio, 0.5);
        assert!(features.variance > 16000.0);
        // Rows alternate, so y-1 and y+1 are equal: no vertical edges at all.
        assert_eq!(features.edge_density, 0.0);
        assert_eq!(features.score, 25 + 15);
    }

    #[test]
    fn test_vertical_stripes_of_two_give_edges() {
        let img = gray_image(20, 20, |x, _| if (x / 2) % 2 == 0 { 0 } else { 255 });
        let density = edge_density(&img, 50);
        assert_eq!(density, 1.0);
    }

    #[test]
    fn test_edge_threshold_is_strict() {
        let img = gray_image(3, 3, |x, _| (x * 25) as u8);
        // right - left = 50, not > 50
        assert_eq!(edge_density(&img, 50), 0.0);
        assert_eq!(edge_density(&img, 49), 1.0);
    }

    #[test]
    fn test_tiny_images_skip_edges() {
        for (w, h) in [(1, 1), (2, 5), (5, 2)] {
            let img = gray_image(w, h, |x, y| ((x + y) * 100) as u8);
            assert_eq!(edge_density(&img, 50), 0.0);
            assert!(analyze_visual_features(&img, &VisualThresholds::default()).is_ok());
        }
    }

    #[test]
    fn test_population_variance() {
        assert_eq!(population_variance(&[]), 0.0);
        assert_eq!(population_variance(&[7]), 0.0);
        assert_eq!(population_variance(&[0, 100]), 2500.0);
    }

    #[test]
    fn test_empty_buffer_is_computation_error() {
        let img = SampledImage {
            width: 0,
            height: 0,
            rgb: Vec::new(),
            gray: Vec::new(),
        };
        assert!(matches!(
            analyze_visual_features(&img, &VisualThresholds::default()),
            Err(ClassifyError::Computation(_))
        ));
    }
}
