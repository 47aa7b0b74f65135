//! Classifier Error Types
//!
//! Every variant here is caught at the aggregator boundary and turned into a
//! fail-open result; none of them reach callers of `HazardClassifier::classify*`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to analyze image: {0}")]
    Computation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for ClassifyError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => ClassifyError::Io(e),
            other => ClassifyError::Decode(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
