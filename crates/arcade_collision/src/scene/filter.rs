//! Name-based mesh filtering

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Case-insensitive substring include/exclude filter on mesh names.
///
/// An empty include list accepts every name. A name matching both lists is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshFilter {
    /// Substrings a name must contain (any of them); empty means "all"
    pub include: Vec<String>,
    /// Substrings that reject a name (any of them)
    pub exclude: Vec<String>,
}

impl Default for MeshFilter {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: vec!["ground".to_string()],
        }
    }
}

impl Config for MeshFilter {}

impl MeshFilter {
    /// Filter that accepts every mesh
    pub fn accept_all() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Add an include pattern
    pub fn with_include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    /// Add an exclude pattern
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Check a mesh name against the filter
    pub fn accepts(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        let matches = |pattern: &String| name.contains(&pattern.to_lowercase());

        if self.exclude.iter().any(matches) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_excludes_ground() {
        let filter = MeshFilter::default();
        assert!(!filter.accepts("GroundPlane"));
        assert!(!filter.accepts("track_ground_02"));
        assert!(filter.accepts("Wall"));
    }

    #[test]
    fn test_include_is_case_insensitive() {
        let filter = MeshFilter::accept_all().with_include("WALL").with_include("pillar");
        assert!(filter.accepts("north_wall"));
        assert!(filter.accepts("Pillar.001"));
        assert!(!filter.accepts("tree"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = MeshFilter::accept_all().with_include("wall").with_exclude("decor");
        assert!(filter.accepts("wall_a"));
        assert!(!filter.accepts("wall_decor"));
    }

    #[test]
    fn test_filter_from_toml() {
        let filter = MeshFilter::from_str_as(
            "include = [\"barrier\"]\n",
            crate::config::ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(filter.include, vec!["barrier".to_string()]);
        // Missing fields fall back to defaults
        assert_eq!(filter.exclude, vec!["ground".to_string()]);
    }
}
