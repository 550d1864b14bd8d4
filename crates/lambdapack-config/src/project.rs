//! `[project]` metadata (PEP 621) used to assemble per-function requirements

use serde::Deserialize;
use std::collections::BTreeMap;

/// Dependency metadata declared in `pyproject.toml`
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    /// Core requirement specifiers shared by every function
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Extra requirement specifiers keyed by function module name
    #[serde(default, rename = "optional-dependencies")]
    pub optional_dependencies: BTreeMap<String, Vec<String>>,
}

impl ProjectMetadata {
    /// Requirement specifiers for one function module: core dependencies plus
    /// the optional group named after the module, sorted.
    ///
    /// Duplicates are kept; only the order is normalised.
    pub fn dependencies_for(&self, module_name: &str) -> Vec<String> {
        let mut deps: Vec<String> = self
            .dependencies
            .iter()
            .chain(
                self.optional_dependencies
                    .get(module_name)
                    .into_iter()
                    .flatten(),
            )
            .cloned()
            .collect();
        deps.sort();
        deps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ProjectMetadata {
        let mut optional = BTreeMap::new();
        optional.insert(
            "mylambda1func".to_string(),
            vec!["requests>=2".to_string(), "boto3".to_string()],
        );
        ProjectMetadata {
            name: "my-app".to_string(),
            version: Some("0.0.1".to_string()),
            dependencies: vec!["pydantic".to_string(), "attrs".to_string()],
            optional_dependencies: optional,
        }
    }

    #[test]
    fn test_dependencies_for_merges_and_sorts() {
        let deps = metadata().dependencies_for("mylambda1func");
        assert_eq!(deps, vec!["attrs", "boto3", "pydantic", "requests>=2"]);
    }

    #[test]
    fn test_dependencies_for_unknown_module_returns_core() {
        let deps = metadata().dependencies_for("other");
        assert_eq!(deps, vec!["attrs", "pydantic"]);
    }

    #[test]
    fn test_dependencies_for_empty_project() {
        let deps = ProjectMetadata::default().dependencies_for("anything");
        assert!(deps.is_empty());
    }
}
