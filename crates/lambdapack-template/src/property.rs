//! String property extraction with a document-wide fallback

use crate::errors::TemplateError;
use serde_yaml::Value;

/// Shape of one property value as found in the template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property<'a> {
    /// A non-empty literal string
    Literal(&'a str),
    /// Absent, or an empty string
    Missing,
    /// Present but not a string: a mapping, number, or an intrinsic function
    WrongShape,
}

impl<'a> Property<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            None => Property::Missing,
            Some(Value::String(s)) if s.is_empty() => Property::Missing,
            Some(Value::String(s)) => Property::Literal(s),
            Some(_) => Property::WrongShape,
        }
    }
}

/// Resolve `name` for `unit` from its own properties, falling back to `default`.
///
/// The resource's own value wins and is validated first, so a malformed
/// resource value is an error even when a usable default exists.
pub fn extract(
    unit: &str,
    properties: &Value,
    name: &str,
    default: Option<&Value>,
) -> Result<String, TemplateError> {
    let own = Property::classify(properties.get(name));
    let resolved = match own {
        Property::Missing => Property::classify(default),
        other => other,
    };

    match resolved {
        Property::Literal(value) => Ok(value.to_string()),
        Property::Missing => Err(TemplateError::PropertyMissing {
            unit: unit.to_string(),
            property: name.to_string(),
        }),
        Property::WrongShape => Err(TemplateError::UnsupportedPropertyType {
            unit: unit.to_string(),
            property: name.to_string(),
        }),
    }
}
