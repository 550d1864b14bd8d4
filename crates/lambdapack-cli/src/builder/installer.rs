use crate::errors::BuildError;
use lambdapack_logger as logger;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Installs the requirements listed in a file into a target directory
pub trait DependencyInstaller {
    fn install(&self, requirements: &Path, target: &Path) -> Result<(), BuildError>;
}

/// `pip install --upgrade ... -r <requirements> -t <target>`
#[derive(Debug, Clone)]
pub struct PipInstaller {
    exec: String,
}

impl PipInstaller {
    pub fn new(exec: impl Into<String>) -> Self {
        Self { exec: exec.into() }
    }

    pub fn command_args(requirements: &Path, target: &Path) -> Vec<String> {
        vec![
            "install".to_string(),
            "--upgrade".to_string(),
            "--disable-pip-version-check".to_string(),
            "--no-python-version-warning".to_string(),
            "-r".to_string(),
            requirements.to_string_lossy().to_string(),
            "-t".to_string(),
            target.to_string_lossy().to_string(),
        ]
    }
}

impl DependencyInstaller for PipInstaller {
    fn install(&self, requirements: &Path, target: &Path) -> Result<(), BuildError> {
        let program = which::which(&self.exec).unwrap_or_else(|_| PathBuf::from(&self.exec));
        let args = Self::command_args(requirements, target);
        logger::debug(&format!("Running: {} {}", program.display(), args.join(" ")));

        // Arguments go straight to the process; no shell is involved.
        let output = Command::new(&program)
            .args(&args)
            .output()
            .map_err(|source| BuildError::CommandSpawn {
                command: format!("{} install", self.exec),
                source,
            })?;
        logger::capture_output(&format!("{} install", self.exec), &output);

        if !output.status.success() {
            return Err(BuildError::InstallError {
                requirements: requirements.to_path_buf(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        Ok(())
    }
}
