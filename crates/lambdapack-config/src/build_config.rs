//! Build target settings from `[tool.hatch.build.targets.aws]`
//!
//! Every field is validated when the config is constructed so a type error
//! surfaces before any filesystem or subprocess work starts.

use crate::errors::ConfigError;
use std::path::{Component, Path, PathBuf};
use toml::{Table, Value};

/// Name of the build target table under `tool.hatch.build.targets`
pub const PLUGIN_NAME: &str = "aws";
pub const DEFAULT_TEMPLATE: &str = "template.yml";
pub const DEFAULT_BUILD_DIR: &str = ".aws-sam/build";
pub const DEFAULT_SAM_EXEC: &str = "sam";
pub const DEFAULT_PIP_EXEC: &str = "pip";

/// Environment variable overriding the packager executable
pub const SAM_EXEC_ENV: &str = "HATCH_SAM_EXEC";
/// Environment variable overriding the dependency installer executable
pub const PIP_EXEC_ENV: &str = "HATCH_PIP_EXEC";

/// Marker that turns a distribution path into a prefix pattern
pub const GLOB_MARKER: char = '*';

/// A file or directory copied into the build output regardless of the
/// function's own source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceInclude {
    /// Path relative to the project root
    pub source: PathBuf,
    /// Destination relative to the build target, possibly containing [`GLOB_MARKER`]
    pub distribution: String,
}

impl ForceInclude {
    pub fn new(source: impl Into<PathBuf>, distribution: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            distribution: distribution.into(),
        }
    }

    pub fn is_glob(&self) -> bool {
        self.distribution.contains(GLOB_MARKER)
    }
}

/// Resolved build settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Build output root
    pub directory: PathBuf,
    /// Deployment descriptor
    pub template: PathBuf,
    /// Hand the whole build to the packager and skip per-function assembly
    pub use_sam: bool,
    /// Extra arguments appended to the packager command line
    pub sam_params: Vec<String>,
    pub sam_exec: String,
    pub use_container: bool,
    pub parameter_overrides: Vec<(String, String)>,
    pub force_include: Vec<ForceInclude>,
    pub pip_exec: String,
    /// Install dependencies into the build root instead of each function directory
    pub shared_dependencies: bool,
}

impl BuildConfig {
    /// Build the config from the `[tool]` table of a `pyproject.toml`.
    ///
    /// `env` looks up environment overrides; pass `|k| std::env::var(k).ok()`
    /// for the real process environment.
    pub fn from_tool_table(
        root: &Path,
        tool: &Table,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let empty = Table::new();
        let build_table = tool
            .get("hatch")
            .and_then(Value::as_table)
            .and_then(|hatch| hatch.get("build"))
            .and_then(Value::as_table)
            .unwrap_or(&empty);
        let target_table = build_table
            .get("targets")
            .and_then(Value::as_table)
            .and_then(|targets| targets.get(PLUGIN_NAME))
            .and_then(Value::as_table)
            .unwrap_or(&empty);

        let build = TableReader::new(build_table, "tool.hatch.build".to_string());
        let target = TableReader::new(
            target_table,
            format!("tool.hatch.build.targets.{}", PLUGIN_NAME),
        );

        let directory = match target.string("directory")? {
            Some(directory) => directory,
            None => build
                .string("directory")?
                .unwrap_or_else(|| DEFAULT_BUILD_DIR.to_string()),
        };

        let template = match target.string("template")? {
            Some(template) => template,
            None => target
                .string("template-name")?
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
        };

        let sam_exec = match env(SAM_EXEC_ENV) {
            Some(exec) if !exec.trim().is_empty() => exec,
            _ => match target.string("sam-exec")? {
                Some(exec) => exec,
                None => target
                    .string("sam_exec")?
                    .unwrap_or_else(|| DEFAULT_SAM_EXEC.to_string()),
            },
        };

        let pip_exec = match env(PIP_EXEC_ENV) {
            Some(exec) if !exec.trim().is_empty() => exec,
            _ => target
                .string("pip-exec")?
                .unwrap_or_else(|| DEFAULT_PIP_EXEC.to_string()),
        };

        let force_include = match target.path_pairs("force-include")? {
            Some(pairs) => pairs,
            None => build.path_pairs("force-include")?.unwrap_or_default(),
        };

        Ok(Self {
            directory: resolve_against(root, &directory),
            template: resolve_against(root, &template),
            use_sam: target.bool("use-sam")?.unwrap_or(false),
            sam_params: target.string_list("sam-params")?.unwrap_or_default(),
            sam_exec,
            use_container: target.bool("use-container")?.unwrap_or(false),
            parameter_overrides: target
                .key_values("parameter-overrides")?
                .unwrap_or_default(),
            force_include,
            pip_exec,
            shared_dependencies: target.bool("shared-dependencies")?.unwrap_or(false),
        })
    }

    /// Arguments appended after `--template`/`--build-dir` on the packager command line
    pub fn packager_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.use_container {
            args.push("--use-container".to_string());
        }
        if !self.parameter_overrides.is_empty() {
            args.push("--parameter-overrides".to_string());
            args.extend(
                self.parameter_overrides
                    .iter()
                    .map(|(key, value)| format!("{}={}", key, value)),
            );
        }
        args.extend(self.sam_params.iter().cloned());
        args
    }
}

/// `path` as given when absolute, otherwise relative to `root`
pub fn resolve_against(root: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Typed accessors over one TOML table, reporting errors by full key
struct TableReader<'a> {
    table: &'a Table,
    prefix: String,
}

impl<'a> TableReader<'a> {
    fn new(table: &'a Table, prefix: String) -> Self {
        Self { table, prefix }
    }

    fn invalid(&self, key: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidField {
            field: format!("{}.{}", self.prefix, key),
            expected,
        }
    }

    fn string(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    fn bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(*b)),
            Some(_) => Err(self.invalid(key, "a boolean")),
        }
    }

    fn string_list(&self, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
        let Some(value) = self.table.get(key) else {
            return Ok(None);
        };
        let Some(items) = value.as_array() else {
            return Err(self.invalid(key, "an array of strings"));
        };
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(key, "an array of strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// `{ "src/a" = "dist/a" }` or `[["src/a", "dist/a"], ...]`
    fn path_pairs(&self, key: &str) -> Result<Option<Vec<ForceInclude>>, ConfigError> {
        const EXPECTED: &str = "a table of source paths to distribution paths";
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::Table(table)) => table
                .iter()
                .map(|(source, dist)| match dist {
                    Value::String(dist) => self.force_include(key, source, dist),
                    _ => Err(self.invalid(key, EXPECTED)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item.as_array().map(Vec::as_slice) {
                    Some([Value::String(source), Value::String(dist)]) => {
                        self.force_include(key, source, dist)
                    }
                    _ => Err(self.invalid(key, EXPECTED)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(self.invalid(key, EXPECTED)),
        }
    }

    /// Distribution paths must stay inside the directory they are applied to
    fn force_include(
        &self,
        key: &str,
        source: &str,
        dist: &str,
    ) -> Result<ForceInclude, ConfigError> {
        let escapes = Path::new(dist).components().any(|component| {
            matches!(
                component,
                Component::RootDir | Component::Prefix(_) | Component::ParentDir
            )
        });
        if escapes {
            return Err(self.invalid(key, "relative distribution paths without `..`"));
        }
        Ok(ForceInclude::new(source, dist))
    }

    /// A table, or an array of inline tables, of scalar values
    fn key_values(&self, key: &str) -> Result<Option<Vec<(String, String)>>, ConfigError> {
        const EXPECTED: &str = "a table or an array of inline tables";
        let tables: Vec<&Table> = match self.table.get(key) {
            None => return Ok(None),
            Some(Value::Table(table)) => vec![table],
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_table().ok_or_else(|| self.invalid(key, EXPECTED)))
                .collect::<Result<_, _>>()?,
            Some(_) => return Err(self.invalid(key, EXPECTED)),
        };

        let mut pairs = Vec::new();
        for table in tables {
            for (name, value) in table {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    Value::Integer(i) => i.to_string(),
                    Value::Float(f) => f.to_string(),
                    Value::Boolean(b) => b.to_string(),
                    _ => return Err(self.invalid(key, EXPECTED)),
                };
                pairs.push((name.clone(), rendered));
            }
        }
        Ok(Some(pairs))
    }
}
