//! Function resolution
//!
//! Selects `AWS::Serverless::Function` resources, merges them with
//! `Globals.Function` defaults and derives where each function's code lives.

use crate::errors::TemplateError;
use crate::loader::Template;
use crate::property;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const FUNCTION_RESOURCE_TYPE: &str = "AWS::Serverless::Function";
pub const CODE_URI: &str = "CodeUri";
pub const HANDLER: &str = "Handler";

/// One deployable function with its source location fully resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUnit {
    name: String,
    source_dir: PathBuf,
    handler_path: PathBuf,
    module_dir: PathBuf,
}

impl ResolvedUnit {
    /// Derive handler and module paths from a `module.path.function` handler string
    pub fn new(name: impl Into<String>, source_dir: impl Into<PathBuf>, handler: &str) -> Self {
        let segments: Vec<&str> = handler.split('.').filter(|s| !s.is_empty()).collect();
        let handler_path: PathBuf = segments.iter().collect();
        // Drop the module file and the callable name
        let module_dir: PathBuf = if segments.len() > 2 {
            segments[..segments.len() - 2].iter().collect()
        } else {
            PathBuf::from(".")
        };

        Self {
            name: name.into(),
            source_dir: source_dir.into(),
            handler_path,
            module_dir,
        }
    }

    /// Resource key in the template
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `CodeUri`, relative to the project root
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn handler_path(&self) -> &Path {
        &self.handler_path
    }

    /// The function's own code directory, relative to [`Self::source_dir`]
    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    /// Key of the optional dependency group holding this function's requirements
    pub fn module_name(&self) -> String {
        self.name.to_lowercase()
    }
}

impl Template {
    /// Resolve every function resource, in document order
    pub fn units(&self) -> Result<Vec<ResolvedUnit>, TemplateError> {
        resolve(self.document())
    }
}

/// Resolve all function resources of a parsed template.
///
/// Fails on the first function whose `CodeUri` or `Handler` cannot be
/// resolved; no partial list is returned.
pub fn resolve(document: &Value) -> Result<Vec<ResolvedUnit>, TemplateError> {
    let resources = document
        .get("Resources")
        .and_then(Value::as_mapping)
        .ok_or_else(|| {
            TemplateError::InvalidTemplate("missing `Resources` mapping".to_string())
        })?;

    let globals = document.get("Globals").and_then(|g| g.get("Function"));
    let default_code_uri = globals.and_then(|g| g.get(CODE_URI));
    let default_handler = globals.and_then(|g| g.get(HANDLER));

    let empty = Value::Null;
    let mut units = Vec::new();

    for (key, resource) in resources {
        if resource.get("Type").and_then(Value::as_str) != Some(FUNCTION_RESOURCE_TYPE) {
            continue;
        }

        let name = match key.as_str() {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(TemplateError::InvalidTemplate(format!(
                    "function resource has a non-string or empty name: {:?}",
                    key
                )))
            }
        };

        let properties = match resource.get("Properties") {
            None | Some(Value::Null) => &empty,
            Some(props @ Value::Mapping(_)) => props,
            Some(_) => {
                return Err(TemplateError::InvalidTemplate(format!(
                    "`Properties` of '{}' must be a mapping",
                    name
                )))
            }
        };

        let code_uri = property::extract(name, properties, CODE_URI, default_code_uri)?;
        let handler = property::extract(name, properties, HANDLER, default_handler)?;

        let unit = ResolvedUnit::new(name, code_uri, &handler);
        debug!(
            "Resolved function {} -> source {:?}, module {:?}",
            unit.name(),
            unit.source_dir(),
            unit.module_dir()
        );
        units.push(unit);
    }

    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_document;

    const TEMPLATE: &str = r#"
AWSTemplateFormatVersion: '2010-09-09'
Transform: AWS::Serverless-2016-10-31

Globals:
  Function:
    Runtime: python3.9
    CodeUri: src

Parameters:
  PythonVersion:
    Type: String

Resources:
  MyLambda2Func:
    Type: AWS::Serverless::Function
    Properties:
      Handler: my_app.lambdas.lambda2.main.app
      Events:
        Api:
          Type: Api
          Properties:
            Path: /hello
            Method: get
  SrcBucket:
    Type: AWS::S3::Bucket
    Properties:
      BucketName: !Sub "${AWS::StackName}-src"
  MyLambda1Func:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: src
      Handler: my_app.lambdas.lambda1.main.app
      Policies: AWSLambdaExecute
  MyLambda3Func:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: src/my_app/lambdas/lambda3
      Handler: main.app
"#;

    fn resolve_str(content: &str) -> Result<Vec<ResolvedUnit>, TemplateError> {
        resolve(&parse_document(content)?)
    }

    #[test]
    fn test_resolves_functions_in_document_order() {
        let Ok(units) = resolve_str(TEMPLATE) else {
            panic!("template should resolve");
        };
        let names: Vec<&str> = units.iter().map(ResolvedUnit::name).collect();
        assert_eq!(names, vec!["MyLambda2Func", "MyLambda1Func", "MyLambda3Func"]);
        assert_eq!(units[0].source_dir(), Path::new("src"));
        assert_eq!(units[2].source_dir(), Path::new("src/my_app/lambdas/lambda3"));
    }

    #[test]
    fn test_handler_and_module_paths() {
        let unit = ResolvedUnit::new("MyLambdaFunc", "src", "my_app.lambdas.lambda1.main.app");
        assert_eq!(unit.handler_path(), Path::new("my_app/lambdas/lambda1/main/app"));
        assert_eq!(unit.module_dir(), Path::new("my_app/lambdas/lambda1"));
        assert_eq!(unit.module_name(), "mylambdafunc");
    }

    #[test]
    fn test_short_handlers_collapse_to_current_dir() {
        assert_eq!(ResolvedUnit::new("F", "src", "app").module_dir(), Path::new("."));
        assert_eq!(ResolvedUnit::new("F", "src", "main.app").module_dir(), Path::new("."));
        assert_eq!(
            ResolvedUnit::new("F", "src", "pkg.main.app").module_dir(),
            Path::new("pkg")
        );
    }

    #[test]
    fn test_missing_handler_names_resource() {
        let content = r#"
Resources:
  NoHandler:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: src
"#;
        let result = resolve_str(content);
        assert!(matches!(
            result,
            Err(TemplateError::PropertyMissing { ref unit, ref property })
                if unit == "NoHandler" && property == "Handler"
        ));
    }

    #[test]
    fn test_global_handler_default() {
        let content = r#"
Globals:
  Function:
    Handler: main.app
Resources:
  Func:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: src
"#;
        let result = resolve_str(content);
        assert!(result.is_ok_and(|units| units.len() == 1
            && units[0].handler_path() == Path::new("main/app")));
    }

    #[test]
    fn test_mapping_code_uri_fails_despite_global_default() {
        let content = r#"
Globals:
  Function:
    CodeUri: src
Resources:
  Func:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri:
        Bucket: artifacts
        Key: func.zip
      Handler: main.app
"#;
        let result = resolve_str(content);
        assert!(matches!(
            result,
            Err(TemplateError::UnsupportedPropertyType { ref property, .. }) if property == "CodeUri"
        ));
    }

    #[test]
    fn test_one_bad_function_fails_the_batch() {
        let content = r#"
Resources:
  Good:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: src
      Handler: main.app
  Bad:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: !Ref CodeLocation
      Handler: main.app
"#;
        let result = resolve_str(content);
        assert!(result.is_err_and(|e| e.is_property_error()));
    }

    #[test]
    fn test_type_match_is_case_sensitive() {
        let content = r#"
Resources:
  Func:
    Type: aws::serverless::function
    Properties:
      CodeUri: src
      Handler: main.app
"#;
        assert!(resolve_str(content).is_ok_and(|units| units.is_empty()));
    }

    #[test]
    fn test_resource_without_properties_uses_globals() {
        let content = r#"
Globals:
  Function:
    CodeUri: src
    Handler: app.handler
Resources:
  Func:
    Type: AWS::Serverless::Function
"#;
        assert!(resolve_str(content).is_ok_and(|units| units.len() == 1));
    }

    #[test]
    fn test_missing_resources_is_invalid() {
        let result = resolve_str("Globals: {}\n");
        assert!(matches!(result, Err(TemplateError::InvalidTemplate(_))));
    }
}
