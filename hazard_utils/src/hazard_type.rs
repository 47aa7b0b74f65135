//! Type Classifier
//!
//! Filename evidence always outranks pixel evidence: the ordered keyword
//! groups are consulted first and only when none match do the component
//! scores pick a category.

use crate::config::CategoryRules;
use crate::filename_heuristic::normalized_base_name;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardCategory {
    Road,
    Infrastructure,
    Environment,
    Health,
    Public,
    Unknown,
    Other,
}

impl HazardCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardCategory::Road => "road",
            HazardCategory::Infrastructure => "infrastructure",
            HazardCategory::Environment => "environment",
            HazardCategory::Health => "health",
            HazardCategory::Public => "public",
            HazardCategory::Unknown => "unknown",
            HazardCategory::Other => "other",
        }
    }
}

impl fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn determine_hazard_type(
    file_name: &str,
    visual_score: u32,
    color_score: u32,
    texture_score: u32,
    rules: &CategoryRules,
) -> HazardCategory {
    let name = normalized_base_name(file_name);

    if let Some(group) = rules.groups.iter().find(|g| {
        g.keywords
            .iter()
            .any(|k| name.contains(k.to_lowercase().as_str()))
    }) {
        return group.category;
    }

    if visual_score > rules.visual_score && texture_score > rules.texture_score {
        HazardCategory::Road
    } else if color_score > rules.color_score {
        HazardCategory::Environment
    } else {
        HazardCategory::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_name(name: &str) -> HazardCategory {
        determine_hazard_type(name, 0, 0, 0, &CategoryRules::default())
    }

    #[test]
    fn test_filename_groups() {
        assert_eq!(by_name("pothole_main_street.jpg"), HazardCategory::Road);
        assert_eq!(by_name("old_bridge.png"), HazardCategory::Infrastructure);
        assert_eq!(by_name("fallen_tree.jpg"), HazardCategory::Environment);
        assert_eq!(by_name("sewage.jpg"), HazardCategory::Health);
        assert_eq!(by_name("unsafe_wiring.jpg"), HazardCategory::Public);
    }

    #[test]
    fn test_priority_order() {
        // road group beats infrastructure, environment beats health.
        assert_eq!(by_name("bridge_road.jpg"), HazardCategory::Road);
        assert_eq!(by_name("garbage_fire.jpg"), HazardCategory::Environment);
    }

    #[test]
    fn test_filename_outranks_pixels() {
        let rules = CategoryRules::default();
        assert_eq!(
            determine_hazard_type("garbage.jpg", 50, 80, 15, &rules),
            HazardCategory::Health
        );
        assert_eq!(
            determine_hazard_type("pothole_main_street.jpg", 0, 80, 0, &rules),
            HazardCategory::Road
        );
    }

    #[test]
    fn test_pixel_fallbacks() {
        let rules = CategoryRules::default();
        assert_eq!(determine_hazard_type("img.jpg", 25, 0, 15, &rules), HazardCategory::Road);
        assert_eq!(
            determine_hazard_type("img.jpg", 25, 25, 0, &rules),
            HazardCategory::Environment
        );
        assert_eq!(determine_hazard_type("img.jpg", 15, 15, 15, &rules), HazardCategory::Other);
    }

    #[test]
    fn test_fallback_thresholds_are_strict() {
        let rules = CategoryRules::default();
        assert_eq!(determine_hazard_type("a.png", 16, 0, 10, &rules), HazardCategory::Other);
        assert_eq!(determine_hazard_type("a.png", 16, 0, 11, &rules), HazardCategory::Road);
        assert_eq!(determine_hazard_type("a.png", 0, 16, 0, &rules), HazardCategory::Environment);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&HazardCategory::Infrastructure).unwrap(),
            "\"infrastructure\""
        );
        let parsed: HazardCategory = serde_json::from_str("\"public\"").unwrap();
        assert_eq!(parsed, HazardCategory::Public);
        assert_eq!(HazardCategory::Unknown.to_string(), "unknown");
    }
}
