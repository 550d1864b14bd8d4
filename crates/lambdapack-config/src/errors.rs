use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or validating project configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse pyproject.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Field `{field}` must be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    #[error("pyproject.toml has no [project] table with a name")]
    MissingProject,
}
