//! Texture Analyzer
//!
//! Samples 3x3 neighbourhoods on a coarse grid and counts how many are
//! irregular (high local variance). Block variance is the sample variance
//! (n - 1 denominator) of the block's intensities.

use crate::config::TextureThresholds;
use crate::image_sampler::SampledImage;
use serde::{Deserialize, Serialize};

const BLOCK: u32 = 3;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextureProfile {
    pub high_variance_blocks: usize,
    pub total_blocks: usize,
    pub score: u32,
}

impl TextureProfile {
    pub fn irregular_ratio(&self) -> f64 {
        if self.total_blocks == 0 {
            0.0
        } else {
            self.high_variance_blocks as f64 / self.total_blocks as f64
        }
    }
}

pub fn analyze_texture(img: &SampledImage, t: &TextureThresholds) -> TextureProfile {
    if img.width < t.min_side || img.height < t.min_side {
        tracing::debug!(
            width = img.width,
            height = img.height,
            min_side = t.min_side,
            "Image below texture floor, skipping"
        );
        return TextureProfile::default();
    }

    let stride = t.grid_stride.max(1) as usize;
    let mut profile = TextureProfile::default();
    let mut block = Vec::with_capacity((BLOCK * BLOCK) as usize);

    for y in (0..img.height.saturating_sub(BLOCK)).step_by(stride) {
        for x in (0..img.width.saturating_sub(BLOCK)).step_by(stride) {
            block.clear();
            for by in y..(y + BLOCK).min(img.height) {
                for bx in x..(x + BLOCK).min(img.width) {
                    block.push(img.gray_at(bx, by));
                }
            }

            if block.len() > 1 {
                if sample_variance(&block) > t.block_variance {
                    profile.high_variance_blocks += 1;
                }
                profile.total_blocks += 1;
            }
        }
    }

    if profile.total_blocks > 0 && profile.irregular_ratio() > t.irregular_ratio {
        profile.score = t.weight;
    }

    tracing::debug!(
        high_variance_blocks = profile.high_variance_blocks,
        total_blocks = profile.total_blocks,
        score = profile.score,
        "Texture profile"
    );

    profile
}

pub fn sample_variance(values: &[u8]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / (n - 1.0)
}
