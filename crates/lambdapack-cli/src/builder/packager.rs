//! SAM CLI invocation

use lambdapack_logger as logger;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of one packager run. A failed run is data, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackagingOutcome {
    pub succeeded: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Builds the whole template into `build_dir`
pub trait Packager {
    fn invoke(&self, template: &Path, build_dir: &Path, extra_args: &[String]) -> PackagingOutcome;
}

/// Runs `<exec> build --template <template> --build-dir <dir> [extra args...]`
#[derive(Debug, Clone)]
pub struct SamCli {
    exec: String,
}

impl SamCli {
    pub fn new(exec: impl Into<String>) -> Self {
        Self { exec: exec.into() }
    }

    pub fn command_args(template: &Path, build_dir: &Path, extra_args: &[String]) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "--template".to_string(),
            template.to_string_lossy().to_string(),
            "--build-dir".to_string(),
            build_dir.to_string_lossy().to_string(),
        ];
        args.extend(extra_args.iter().cloned());
        args
    }

    fn program(&self) -> PathBuf {
        which::which(&self.exec).unwrap_or_else(|_| PathBuf::from(&self.exec))
    }
}

impl Packager for SamCli {
    fn invoke(&self, template: &Path, build_dir: &Path, extra_args: &[String]) -> PackagingOutcome {
        let args = Self::command_args(template, build_dir, extra_args);
        let program = self.program();
        logger::debug(&format!("Running: {} {}", program.display(), args.join(" ")));

        // SAM's own progress output is captured; keep ours out of the way until it finishes.
        let _quiet = logger::quiet();

        match Command::new(&program).args(&args).output() {
            Ok(output) => {
                logger::capture_output(&format!("{} build", self.exec), &output);
                PackagingOutcome {
                    succeeded: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                }
            }
            Err(e) => PackagingOutcome {
                succeeded: false,
                stdout: String::new(),
                stderr: format!("Failed to run `{}`: {}\n", program.display(), e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_append_extra() {
        let args = SamCli::command_args(
            Path::new("/p/template.yml"),
            Path::new("/p/.aws-sam/build"),
            &["--parameter-overrides".to_string(), "PythonVersion=3.9".to_string()],
        );
        assert_eq!(
            args,
            vec![
                "build",
                "--template",
                "/p/template.yml",
                "--build-dir",
                "/p/.aws-sam/build",
                "--parameter-overrides",
                "PythonVersion=3.9",
            ]
        );
    }

    #[test]
    fn test_missing_executable_is_reported_not_raised() {
        let sam = SamCli::new("lambdapack-definitely-not-installed-sam");
        let outcome = sam.invoke(Path::new("template.yml"), Path::new("build"), &[]);
        assert!(!outcome.succeeded);
        assert!(outcome.stderr.contains("lambdapack-definitely-not-installed-sam"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_captures_output() {
        let sam = SamCli::new("false");
        let outcome = sam.invoke(Path::new("template.yml"), Path::new("build"), &[]);
        assert!(!outcome.succeeded);
    }
}
