//! Batch Processing Module
//!
//! Collects candidate images from a directory and classifies them in parallel
//! against one shared classifier.

use crate::classifier::{ClassificationResult, HazardClassifier};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "jpe", "jfif", "gif", "webp", "bmp", "tiff", "tif",
];

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .map(|e| extensions.contains(&e.as_str()))
        .unwrap_or(false)
}

/// Files under `dir` with one of `extensions`, sorted by path.
pub fn collect_files(dir: &Path, extensions: &[&str], recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(dir).follow_links(true)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Classify every file in parallel; output order matches `files`.
pub fn classify_files(
    classifier: &HazardClassifier,
    files: &[PathBuf],
) -> Vec<(PathBuf, ClassificationResult)> {
    classify_files_with(classifier, files, || {})
}

/// Like [`classify_files`], calling `on_done` after each file (from worker threads).
pub fn classify_files_with<F>(
    classifier: &HazardClassifier,
    files: &[PathBuf],
    on_done: F,
) -> Vec<(PathBuf, ClassificationResult)>
where
    F: Fn() + Sync,
{
    files
        .par_iter()
        .map(|path| {
            let result = classifier.classify_path(path);
            on_done();
            (path.clone(), result)
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Accepted only because the classifier could not analyze the file.
    pub failed_open: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: &Path, result: &ClassificationResult) {
        self.total += 1;
        if result.is_fail_open() {
            self.failed_open += 1;
            self.failures.push((path.to_path_buf(), result.reason.clone()));
        }
        if result.accepted {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.accepted as f64 / self.total as f64) * 100.0
        }
    }
}

impl<'a> FromIterator<&'a (PathBuf, ClassificationResult)> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = &'a (PathBuf, ClassificationResult)>>(iter: I) -> Self {
        let mut summary = BatchSummary::new();
        for (path, result) in iter {
            summary.record(path, result);
        }
        summary
    }
}
