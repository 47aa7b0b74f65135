//! Hazard Report Validation
//!
//! The record handed to the hazard-reporting workflow, plus the upload policy
//! checked before an image is classified at all. Policy failures are request
//! errors and are reported as such; only classification itself fails open.

use crate::classifier::{ClassificationResult, HazardClassifier};
use crate::hazard_type::HazardCategory;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const REJECTION_MESSAGE: &str = "Please upload a related picture.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("No image selected")]
    NoFileSelected,

    #[error("Invalid file type. Please upload JPG, PNG, or GIF images.")]
    InvalidType { extension: Option<String> },

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    pub allowed_extensions: Vec<String>,
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: ["png", "jpg", "jpeg", "gif"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

impl UploadPolicy {
    pub fn check(&self, file_name: &str, size: u64) -> Result<(), UploadError> {
        if file_name.is_empty() {
            return Err(UploadError::NoFileSelected);
        }

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase());
        let allowed = extension
            .as_deref()
            .map(|ext| self.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);
        if !allowed {
            return Err(UploadError::InvalidType { extension });
        }

        if size > self.max_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Wire record consumed by the reporting workflow: `is_hazard` decides whether
/// the upload is kept or discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardValidation {
    pub is_hazard: bool,
    pub confidence: f64,
    pub hazard_type: HazardCategory,
    pub message: String,
}

impl From<&ClassificationResult> for HazardValidation {
    fn from(result: &ClassificationResult) -> Self {
        let message = if result.accepted {
            format!("Valid hazard image detected ({:.1}% confidence)", result.confidence)
        } else {
            REJECTION_MESSAGE.to_string()
        };
        Self {
            is_hazard: result.accepted,
            confidence: round2(result.confidence),
            hazard_type: result.category,
            message,
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn validate_hazard_image(classifier: &HazardClassifier, path: &Path) -> HazardValidation {
    HazardValidation::from(&classifier.classify_path(path))
}

/// Gate an upload held in memory: policy check first, then classification.
pub fn validate_upload(
    classifier: &HazardClassifier,
    policy: &UploadPolicy,
    file_name: &str,
    bytes: &[u8],
) -> Result<HazardValidation, UploadError> {
    policy.check(file_name, bytes.len() as u64)?;
    let result = classifier.classify_bytes(bytes, file_name);
    Ok(HazardValidation::from(&result))
}
