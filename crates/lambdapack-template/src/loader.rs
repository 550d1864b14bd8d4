//! Template loading
//!
//! SAM templates use intrinsic-function tags (`!Ref`, `!Sub`, `!GetAtt`, ...).
//! Their values are dynamic and cannot be evaluated locally, so every tagged
//! node is replaced with null after parsing.

use crate::errors::TemplateError;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A parsed deployment template
#[derive(Debug, Clone)]
pub struct Template {
    document: Value,
}

impl Template {
    /// Read and parse the template at `path`
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        debug!("Loading template from {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = parse_document(&content)?;
        Ok(Self { document })
    }

    pub fn document(&self) -> &Value {
        &self.document
    }
}

/// Parse YAML text into a tag-free document tree
pub fn parse_document(content: &str) -> Result<Value, TemplateError> {
    let value: Value = serde_yaml::from_str(content)?;
    Ok(strip_tags(value))
}

fn strip_tags(value: Value) -> Value {
    match value {
        Value::Tagged(_) => Value::Null,
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(strip_tags).collect()),
        Value::Mapping(map) => {
            let mut stripped = Mapping::with_capacity(map.len());
            for (key, value) in map {
                stripped.insert(strip_tags(key), strip_tags(value));
            }
            Value::Mapping(stripped)
        }
        other => other,
    }
}
