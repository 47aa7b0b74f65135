//! Classifier Configuration
//!
//! Keyword tables and scoring thresholds for the hazard classifier. Built once
//! by the host, validated, then shared by reference across every call.
//!
//! `Default` reproduces the stock tables. A JSON file may override any subset
//! of fields:
//!
//! ```no_run
//! use hazard_utils::config::ClassifierConfig;
//!
//! let config = ClassifierConfig::from_json_file("classifier.json").expect("bad config");
//! assert!(config.acceptance.threshold > 0);
//! ```

use crate::hazard_type::HazardCategory;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Grayscale statistics thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualThresholds {
    /// Intensities strictly below this count as dark.
    pub dark_intensity: u8,
    pub dark_ratio: f64,
    pub dark_weight: u32,
    pub variance: f64,
    pub variance_weight: u32,
    /// Neighbour difference strictly above this marks an edge pixel.
    pub edge_step: u8,
    pub edge_density: f64,
    pub edge_weight: u32,
}

impl Default for VisualThresholds {
    fn default() -> Self {
        Self {
            dark_intensity: 50,
            dark_ratio: 0.10,
            dark_weight: 25,
            variance: 3000.0,
            variance_weight: 15,
            edge_step: 50,
            edge_density: 0.30,
            edge_weight: 10,
        }
    }
}

/// HSV bucket thresholds. Hue, saturation and value are all in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorThresholds {
    pub sample_stride: usize,
    pub dark_value: f64,
    pub dark_ratio: f64,
    pub dark_weight: u32,
    pub brown_hue: (f64, f64),
    pub brown_saturation: f64,
    pub brown_ratio: f64,
    pub brown_weight: u32,
    /// Hue below `.0` or above `.1` counts as red.
    pub red_hue: (f64, f64),
    pub red_saturation: f64,
    pub red_ratio: f64,
    pub red_weight: u32,
    pub gray_saturation: f64,
    pub gray_value: (f64, f64),
    pub gray_ratio: f64,
    pub gray_weight: u32,
    pub orange_min_red: u8,
    pub orange_green: (u8, u8),
    pub orange_max_blue: u8,
    pub orange_ratio: f64,
    pub orange_weight: u32,
}

impl Default for ColorThresholds {
    fn default() -> Self {
        Self {
            sample_stride: 100,
            dark_value: 0.3,
            dark_ratio: 0.3,
            dark_weight: 15,
            brown_hue: (0.05, 0.15),
            brown_saturation: 0.3,
            brown_ratio: 0.2,
            brown_weight: 10,
            red_hue: (0.05, 0.95),
            red_saturation: 0.5,
            red_ratio: 0.1,
            red_weight: 25,
            gray_saturation: 0.2,
            gray_value: (0.3, 0.7),
            gray_ratio: 0.4,
            gray_weight: 10,
            orange_min_red: 200,
            orange_green: (80, 150),
            orange_max_blue: 100,
            orange_ratio: 0.15,
            orange_weight: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureThresholds {
    /// Both sides must be at least this many pixels, otherwise texture scores 0.
    pub min_side: u32,
    pub grid_stride: u32,
    pub block_variance: f64,
    pub irregular_ratio: f64,
    pub weight: u32,
}

impl Default for TextureThresholds {
    fn default() -> Self {
        Self {
            min_side: 100,
            grid_stride: 20,
            block_variance: 1000.0,
            irregular_ratio: 0.3,
            weight: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilenameRules {
    pub keywords: Vec<String>,
    pub per_match: u32,
    pub cap: u32,
}

impl Default for FilenameRules {
    fn default() -> Self {
        Self {
            keywords: to_strings(&[
                "pothole",
                "crack",
                "damage",
                "broken",
                "fire",
                "flood",
                "garbage",
                "waste",
                "hazard",
                "danger",
                "accident",
                "repair",
                "construction",
                "road",
                "street",
                "bridge",
                "building",
                "infrastructure",
                "leak",
                "spill",
                "pollution",
            ]),
            per_match: 10,
            cap: 25,
        }
    }
}

/// One entry of the ordered filename → category table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: HazardCategory,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    /// Checked in order; the first group with a keyword in the file name wins.
    pub groups: Vec<CategoryGroup>,
    /// Pixel fallback: visual above this AND texture above `texture_score` → road.
    pub visual_score: u32,
    pub texture_score: u32,
    /// Pixel fallback: color above this → environment.
    pub color_score: u32,
}

impl Default for CategoryRules {
    fn default() -> Self {
        let group = |category, words: &[&str]| CategoryGroup {
            category,
            keywords: to_strings(words),
        };
        Self {
            groups: vec![
                group(HazardCategory::Road, &["road", "pothole", "street", "pavement"]),
                group(
                    HazardCategory::Infrastructure,
                    &["building", "bridge", "construction", "infrastructure"],
                ),
                group(
                    HazardCategory::Environment,
                    &["fire", "flood", "tree", "environment"],
                ),
                group(
                    HazardCategory::Health,
                    &["garbage", "waste", "sewage", "pollution"],
                ),
                group(
                    HazardCategory::Public,
                    &["danger", "unsafe", "accident", "safety"],
                ),
            ],
            visual_score: 15,
            texture_score: 10,
            color_score: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceRules {
    /// A total score strictly greater than this is accepted.
    pub threshold: u32,
    pub confidence_cap: f64,
    pub fail_open_confidence: f64,
}

impl Default for AcceptanceRules {
    fn default() -> Self {
        Self {
            threshold: 35,
            confidence_cap: 100.0,
            fail_open_confidence: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub visual: VisualThresholds,
    pub color: ColorThresholds,
    pub texture: TextureThresholds,
    pub filename: FilenameRules,
    pub categories: CategoryRules,
    pub acceptance: AcceptanceRules,
}

impl ClassifierConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate a JSON override file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded classifier config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.color.sample_stride == 0 {
            return Err(ConfigError::Invalid("color.sample_stride must be > 0".into()));
        }
        if self.texture.grid_stride == 0 {
            return Err(ConfigError::Invalid("texture.grid_stride must be > 0".into()));
        }

        let ratios = [
            ("visual.dark_ratio", self.visual.dark_ratio),
            ("visual.edge_density", self.visual.edge_density),
            ("color.dark_ratio", self.color.dark_ratio),
            ("color.brown_ratio", self.color.brown_ratio),
            ("color.red_ratio", self.color.red_ratio),
            ("color.gray_ratio", self.color.gray_ratio),
            ("color.orange_ratio", self.color.orange_ratio),
            ("texture.irregular_ratio", self.texture.irregular_ratio),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.acceptance.confidence_cap <= 0.0 {
            return Err(ConfigError::Invalid(
                "acceptance.confidence_cap must be positive".into(),
            ));
        }
        if self.filename.keywords.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::Invalid(
                "filename.keywords must not contain empty strings".into(),
            ));
        }
        Ok(())
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
