use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a template or resolving its functions
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse template YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Lambda function '{unit}' is missing required '{property}' property!")]
    PropertyMissing { unit: String, property: String },

    #[error(
        "Lambda function '{unit}' has unsupported type for '{property}' property. \
         Only string is supported. Functions !Sub, !Ref and others are not supported yet."
    )]
    UnsupportedPropertyType { unit: String, property: String },
}

impl TemplateError {
    /// True for errors caused by a function's properties rather than the document itself
    pub fn is_property_error(&self) -> bool {
        matches!(
            self,
            TemplateError::PropertyMissing { .. } | TemplateError::UnsupportedPropertyType { .. }
        )
    }
}
