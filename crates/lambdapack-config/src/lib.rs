//! Project configuration for lambdapack
//!
//! Reads `pyproject.toml` from the project root: the `[project]` table supplies
//! dependency metadata and `[tool.hatch.build.targets.aws]` the build settings.

pub mod build_config;
pub mod errors;
pub mod project;

pub use build_config::{resolve_against, BuildConfig, ForceInclude};
pub use errors::ConfigError;
pub use project::ProjectMetadata;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PYPROJECT_FILE: &str = "pyproject.toml";

#[derive(Deserialize)]
struct PyProject {
    project: Option<ProjectMetadata>,
    #[serde(default)]
    tool: toml::Table,
}

/// Everything read from one project's `pyproject.toml`
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub metadata: ProjectMetadata,
    pub build: BuildConfig,
}

impl Project {
    /// Load the project at `root`, honouring environment overrides
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(root, |key| std::env::var(key).ok())
    }

    pub fn load_with_env(
        root: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = root.join(PYPROJECT_FILE);
        debug!("Loading project configuration from {:?}", path);
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(root, &content, env)
    }

    /// Parse `pyproject.toml` content for the project at `root`
    pub fn parse(
        root: &Path,
        content: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let pyproject: PyProject = toml::from_str(content)?;
        let metadata = pyproject.project.ok_or(ConfigError::MissingProject)?;
        if metadata.name.trim().is_empty() {
            return Err(ConfigError::MissingProject);
        }
        let build = BuildConfig::from_tool_table(root, &pyproject.tool, env)?;

        Ok(Self {
            root: root.to_path_buf(),
            metadata,
            build,
        })
    }
}
