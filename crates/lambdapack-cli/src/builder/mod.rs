//! Build orchestration
//!
//! Sequence: resolve the template, run the packager over the whole template,
//! then (unless the packager is trusted with the whole build) rebuild each
//! function directory. Force-includes that copied nothing into any function
//! directory are applied once more at the build root.

pub mod assembler;
pub mod copy;
pub mod installer;
pub mod overlay;
pub mod packager;

use crate::errors::BuildError;
use assembler::{Assembler, DependencyLookup};
use installer::DependencyInstaller;
use lambdapack_config::{BuildConfig, ForceInclude};
use lambdapack_logger as logger;
use lambdapack_template::{ResolvedUnit, Template};
use overlay::OverlayScope;
use packager::Packager;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Terminal state of a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Success(PathBuf),
    Aborted(String),
}

/// Runs one build for a project
pub struct Builder<'a> {
    pub root: &'a Path,
    pub config: &'a BuildConfig,
    pub dependencies: &'a dyn DependencyLookup,
    pub packager: &'a dyn Packager,
    pub installer: &'a dyn DependencyInstaller,
}

impl Builder<'_> {
    pub fn build(&self) -> BuildOutcome {
        match self.run() {
            Ok(directory) => BuildOutcome::Success(directory),
            Err(e) => {
                logger::spinner_stop();
                BuildOutcome::Aborted(e.abort_message())
            }
        }
    }

    /// Resolve and build every function, returning the build directory
    pub fn run(&self) -> Result<PathBuf, BuildError> {
        let units = resolve_units(&self.config.template)?;
        debug!("Resolved {} function(s)", units.len());

        logger::spinner_start("Building lambda functions with SAM...");
        let outcome = self.packager.invoke(
            &self.config.template,
            &self.config.directory,
            &self.config.packager_args(),
        );
        if !outcome.succeeded {
            logger::spinner_error("SAM build failed");
            return Err(BuildError::PackagingFailed {
                stdout: outcome.stdout,
                stderr: outcome.stderr,
            });
        }
        logger::spinner_success("SAM build finished");

        if self.config.use_sam {
            return Ok(self.config.directory.clone());
        }

        let assembler = Assembler {
            root: self.root,
            build_root: &self.config.directory,
            force_include: &self.config.force_include,
            dependencies: self.dependencies,
            installer: self.installer,
            shared_dependencies: self.config.shared_dependencies,
        };

        let mut satisfied = vec![false; self.config.force_include.len()];
        for unit in &units {
            logger::spinner_start(&format!("Building {}...", unit.name()));
            let assembled = assembler.assemble(unit)?;
            for (done, copied) in satisfied.iter_mut().zip(&assembled.included) {
                *done |= *copied > 0;
            }
            logger::spinner_success(&format!(
                "Built {} ({} file(s))",
                unit.name(),
                assembled.files_copied
            ));
        }

        let pending: Vec<&ForceInclude> = self
            .config
            .force_include
            .iter()
            .zip(&satisfied)
            .filter(|(_, done)| !**done)
            .map(|(include, _)| include)
            .collect();
        apply_build_root_overlays(self.root, &self.config.directory, &pending);

        Ok(self.config.directory.clone())
    }
}

/// Load the template and resolve its functions
pub fn resolve_units(template: &Path) -> Result<Vec<ResolvedUnit>, BuildError> {
    Ok(Template::load(template)?.units()?)
}

fn apply_build_root_overlays(root: &Path, build_root: &Path, includes: &[&ForceInclude]) {
    let copied: usize = includes
        .iter()
        .map(|include| overlay::apply(root, build_root, include, OverlayScope::BuildRoot))
        .sum();
    if copied > 0 {
        logger::debug(&format!(
            "Copied {} force-included file(s) at the build root",
            copied
        ));
    }
}
