//! Validation Aggregator
//!
//! Runs the sampler and the four scorers, sums their scores without
//! normalization and applies the acceptance threshold to the unclamped total.
//! Confidence is the total clamped to the configured cap.
//!
//! The public entry points never fail. Any decode or computation error is
//! logged and turned into a fail-open acceptance so a classifier fault never
//! blocks a citizen's report.

use crate::color_analysis::{analyze_colors, ColorProfile};
use crate::config::{AcceptanceRules, ClassifierConfig, ConfigError};
use crate::errors::Result;
use crate::filename_heuristic::{analyze_filename, FilenameScore};
use crate::hazard_type::{determine_hazard_type, HazardCategory};
use crate::image_sampler::SampledImage;
use crate::texture_analysis::{analyze_texture, TextureProfile};
use crate::visual_features::{analyze_visual_features, VisualFeatures};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreVector {
    pub visual: u32,
    pub filename: u32,
    pub color: u32,
    pub texture: u32,
}

impl ScoreVector {
    pub fn new(visual: u32, filename: u32, color: u32, texture: u32) -> Self {
        Self {
            visual,
            filename,
            color,
            texture,
        }
    }

    /// Not normalized and may exceed 100; saturates at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.visual
            .saturating_add(self.filename)
            .saturating_add(self.color)
            .saturating_add(self.texture)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub accepted: bool,
    pub confidence: f64,
    pub category: HazardCategory,
    pub reason: String,
}

impl ClassificationResult {
    pub fn from_scores(
        scores: &ScoreVector,
        category: HazardCategory,
        rules: &AcceptanceRules,
    ) -> Self {
        let total = scores.total();
        let accepted = total > rules.threshold;
        let confidence = (total as f64).min(rules.confidence_cap);
        let reason = if accepted {
            format!("Detected potential hazard indicators (score: {:.1})", total as f64)
        } else {
            "No significant hazard indicators detected in the image".to_string()
        };
        Self {
            accepted,
            confidence,
            category,
            reason,
        }
    }

    pub fn fail_open(cause: &str, rules: &AcceptanceRules) -> Self {
        Self {
            accepted: true,
            confidence: rules.fail_open_confidence,
            category: HazardCategory::Unknown,
            reason: format!("Error during analysis: {}", cause),
        }
    }

    pub fn is_fail_open(&self) -> bool {
        self.category == HazardCategory::Unknown && self.reason.starts_with("Error during analysis")
    }
}

/// Full per-component breakdown of one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardAnalysis {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub visual: VisualFeatures,
    pub filename: FilenameScore,
    pub color: ColorProfile,
    pub texture: TextureProfile,
    pub scores: ScoreVector,
    pub total_score: u32,
    pub result: ClassificationResult,
}

/// Immutable classifier. Holds only keyword tables and thresholds, so one
/// instance can be shared across threads without locking.
#[derive(Debug, Clone, Default)]
pub struct HazardClassifier {
    config: ClassifierConfig,
}

impl HazardClassifier {
    pub fn new(config: ClassifierConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!("Hazard image classifier initialized with heuristic analysis");
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify an image already on disk. The path's base name feeds the
    /// filename heuristic.
    pub fn classify_path(&self, path: &Path) -> ClassificationResult {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.classify_path_as(path, &name)
    }

    /// Classify a stored file under the name the user originally uploaded it
    /// with (temp files are usually renamed).
    pub fn classify_path_as(&self, path: &Path, file_name: &str) -> ClassificationResult {
        self.finish(file_name, self.try_analyze_path(path, file_name))
    }

    pub fn classify_bytes(&self, bytes: &[u8], file_name: &str) -> ClassificationResult {
        self.finish(file_name, self.try_analyze_bytes(bytes, file_name))
    }

    /// Fallible breakdown, for diagnostics. Callers gating uploads should use
    /// the `classify*` methods instead.
    pub fn try_analyze_path(&self, path: &Path, file_name: &str) -> Result<HazardAnalysis> {
        let img = SampledImage::open(path)?;
        self.analyze_sampled(&img, file_name)
    }

    pub fn try_analyze_bytes(&self, bytes: &[u8], file_name: &str) -> Result<HazardAnalysis> {
        let img = SampledImage::from_bytes(bytes)?;
        self.analyze_sampled(&img, file_name)
    }

    pub fn analyze_sampled(&self, img: &SampledImage, file_name: &str) -> Result<HazardAnalysis> {
        let cfg = &self.config;

        let visual = analyze_visual_features(img, &cfg.visual)?;
        let filename = analyze_filename(file_name, &cfg.filename);
        let color = analyze_colors(img, &cfg.color);
        let texture = analyze_texture(img, &cfg.texture);

        let scores = ScoreVector::new(visual.score, filename.score, color.score, texture.score);
        let category = determine_hazard_type(
            file_name,
            scores.visual,
            scores.color,
            scores.texture,
            &cfg.categories,
        );
        let result = ClassificationResult::from_scores(&scores, category, &cfg.acceptance);

        Ok(HazardAnalysis {
            file_name: file_name.to_string(),
            width: img.width,
            height: img.height,
            visual,
            filename,
            color,
            texture,
            total_score: scores.total(),
            scores,
            result,
        })
    }

    fn finish(&self, file_name: &str, outcome: Result<HazardAnalysis>) -> ClassificationResult {
        match outcome {
            Ok(analysis) => {
                let result = analysis.result;
                tracing::info!(
                    file_name,
                    is_hazard = result.accepted,
                    confidence = %format!("{:.2}", result.confidence),
                    hazard_type = %result.category,
                    total_score = analysis.total_score,
                    "Image analysis result"
                );
                result
            }
            Err(e) => {
                tracing::error!(file_name, error = %e, "Error analyzing image");
                tracing::warn!(file_name, "Classifier failed, allowing upload");
                ClassificationResult::fail_open(&e.to_string(), &self.config.acceptance)
            }
        }
    }
}
