use super::load_project;
use crate::errors::BuildError;
use crate::GlobalOpts;
use clap::Args;
use colored::Colorize;
use lambdapack_config::resolve_against;
use lambdapack_logger as logger;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone, Default)]
pub struct CleanArgs {
    /// Build output directory to remove (overrides the configured one)
    #[arg(long)]
    pub directory: Option<PathBuf>,
}

/// Remove `directory` recursively. Returns false when there was nothing to remove.
pub fn clean(directory: &Path) -> Result<bool, BuildError> {
    match fs::remove_dir_all(directory) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub fn handle_clean(args: &CleanArgs, opts: &GlobalOpts) -> Result<(), BuildError> {
    let project = load_project(opts)?;
    let directory = match &args.directory {
        Some(directory) => resolve_against(&project.root, directory),
        None => project.build.directory,
    };

    if clean(&directory)? {
        println!("{}", format!("Removed {}", directory.display()).dimmed());
    } else {
        logger::debug(&format!("Nothing to clean at {}", directory.display()));
    }
    Ok(())
}
