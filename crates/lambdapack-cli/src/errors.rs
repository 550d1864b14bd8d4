//! Error types for the build pipeline

use lambdapack_config::ConfigError;
use lambdapack_template::TemplateError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a build
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("SAM build failed!\n{stdout}{stderr}")]
    PackagingFailed { stdout: String, stderr: String },

    #[error("Installing dependencies from {requirements} failed (exit {status:?}):\n{stderr}")]
    InstallError {
        requirements: PathBuf,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Source directory {path} for function '{unit}' does not exist")]
    SourceMissing { unit: String, path: PathBuf },

    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl BuildError {
    /// Message shown to the operator when the build is aborted
    pub fn abort_message(&self) -> String {
        match self {
            BuildError::Template(TemplateError::PropertyMissing { .. }) => format!(
                "{}\nSet it on the function or under `Globals.Function` as a literal string.",
                self
            ),
            BuildError::Template(TemplateError::UnsupportedPropertyType { .. }) => format!(
                "{}\nReplace the expression with a literal string path.",
                self
            ),
            _ => self.to_string(),
        }
    }
}
