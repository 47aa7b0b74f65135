//! Filename Heuristic
//!
//! Plain substring containment against the lower-cased base name. No
//! tokenization: `streetlight.jpg` matches `street`.

use crate::config::FilenameRules;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilenameScore {
    pub matched: Vec<String>,
    pub score: u32,
}

/// Lower-cased final path component; falls back to the whole input when
/// there is none (e.g. `".."`).
pub fn normalized_base_name(file_name: &str) -> String {
    let trimmed = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let base = Path::new(trimmed)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| trimmed.to_string());
    base.to_lowercase()
}

pub fn analyze_filename(file_name: &str, rules: &FilenameRules) -> FilenameScore {
    let name = normalized_base_name(file_name);

    let mut matched: Vec<String> = Vec::new();
    for keyword in &rules.keywords {
        let keyword = keyword.to_lowercase();
        if name.contains(&keyword) && !matched.contains(&keyword) {
            matched.push(keyword);
        }
    }

    let score = (matched.len() as u32)
        .saturating_mul(rules.per_match)
        .min(rules.cap);

    tracing::debug!(file_name = %name, matched = ?matched, score, "Filename heuristic");

    FilenameScore { matched, score }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(name: &str) -> u32 {
        analyze_filename(name, &FilenameRules::default()).score
    }

    #[test]
    fn test_no_keywords() {
        assert_eq!(score("IMG_2041.jpg"), 0);
    }

    #[test]
    fn test_single_keyword() {
        assert_eq!(score("big_pothole.png"), 10);
    }

    #[test]
    fn test_pothole_main_street() {
        let result = analyze_filename("pothole_main_street.jpg", &FilenameRules::default());
        assert_eq!(result.matched, vec!["pothole", "street"]);
        assert_eq!(result.score, 20);
    }

    #[test]
    fn test_cap_at_twenty_five() {
        assert_eq!(score("road_crack_damage.png"), 25);
        assert_eq!(score("fire_flood_garbage_waste_leak.jpg"), 25);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(score("FLOOD.JPG"), 10);
    }

    #[test]
    fn test_substring_containment() {
        // "streetlight" contains "street"; "roadside" contains "road".
        assert_eq!(score("streetlight.jpg"), 10);
        assert_eq!(score("roadside.jpg"), 10);
    }

    #[test]
    fn test_only_base_name_counts() {
        assert_eq!(score("/uploads/road/IMG_1.jpg"), 0);
        assert_eq!(score("C:\\reports\\fire\\photo.png"), 0);
        assert_eq!(score("/uploads/tmp/fire.png"), 10);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        assert_eq!(score("fire_fire_fire.jpg"), 10);
    }

    #[test]
    fn test_normalized_base_name() {
        assert_eq!(normalized_base_name("/a/b/Pothole.JPG"), "pothole.jpg");
        assert_eq!(normalized_base_name("Flood.png"), "flood.png");
    }
}
