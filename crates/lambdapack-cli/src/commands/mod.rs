pub mod build;
pub mod clean;
pub mod units;

use crate::errors::BuildError;
use crate::GlobalOpts;
use lambdapack_config::Project;
use std::fs;

/// Load `pyproject.toml` from the project root named on the command line
pub fn load_project(opts: &GlobalOpts) -> Result<Project, BuildError> {
    let root = fs::canonicalize(&opts.project)?;
    Ok(Project::load(&root)?)
}
