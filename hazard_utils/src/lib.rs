//! Hazard photo classification for citizen hazard reports
//!
//! This crate gates hazard-report photo uploads with a fixed set of pixel and
//! filename heuristics:
//! - Image sampling (RGB + grayscale buffers)
//! - Visual, color and texture scoring
//! - Filename keyword scoring and hazard category selection
//! - Fail-open aggregation into an accept/reject decision
//! - Upload policy checks and the report record handed to the workflow
//! - Batch classification, summary reporting and logging setup

pub mod errors;
pub mod config;
pub mod image_sampler;
pub mod visual_features;
pub mod color_analysis;
pub mod texture_analysis;
pub mod filename_heuristic;
pub mod hazard_type;
pub mod classifier;
pub mod validation;
pub mod batch;
pub mod report;
pub mod logging;

pub use errors::{ClassifyError, Result};
pub use config::{
    AcceptanceRules, CategoryGroup, CategoryRules, ClassifierConfig, ColorThresholds,
    ConfigError, FilenameRules, TextureThresholds, VisualThresholds,
};
pub use image_sampler::SampledImage;
pub use visual_features::{analyze_visual_features, VisualFeatures};
pub use color_analysis::{analyze_colors, rgb_to_hsv, ColorProfile};
pub use texture_analysis::{analyze_texture, TextureProfile};
pub use filename_heuristic::{analyze_filename, FilenameScore};
pub use hazard_type::{determine_hazard_type, HazardCategory};
pub use classifier::{ClassificationResult, HazardAnalysis, HazardClassifier, ScoreVector};
pub use validation::{
    validate_hazard_image, validate_upload, HazardValidation, UploadError, UploadPolicy,
    REJECTION_MESSAGE,
};
pub use batch::{classify_files, classify_files_with, collect_files, BatchSummary, IMAGE_EXTENSIONS};
pub use report::{print_simple_summary, print_summary_report};
