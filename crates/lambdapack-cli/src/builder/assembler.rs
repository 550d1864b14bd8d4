//! Per-function build directory assembly

use super::copy::{copy_tree_excluding, join_relative, recreate_dir};
use super::installer::DependencyInstaller;
use super::overlay::{self, OverlayScope};
use crate::errors::BuildError;
use lambdapack_config::{ForceInclude, ProjectMetadata};
use lambdapack_logger as logger;
use lambdapack_template::ResolvedUnit;
use std::fs;
use std::path::{Path, PathBuf};

pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Source of requirement specifiers for a function module
pub trait DependencyLookup {
    /// Sorted requirement specifiers for `module_name`
    fn dependencies_for(&self, module_name: &str) -> Vec<String>;
}

impl DependencyLookup for ProjectMetadata {
    fn dependencies_for(&self, module_name: &str) -> Vec<String> {
        ProjectMetadata::dependencies_for(self, module_name)
    }
}

/// What one assembly produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledUnit {
    pub target: PathBuf,
    pub files_copied: usize,
    /// Files copied for each force-include, in configuration order
    pub included: Vec<usize>,
    pub requirements: Option<PathBuf>,
}

/// Assembles function build directories below one build root
pub struct Assembler<'a> {
    pub root: &'a Path,
    pub build_root: &'a Path,
    pub force_include: &'a [ForceInclude],
    pub dependencies: &'a dyn DependencyLookup,
    pub installer: &'a dyn DependencyInstaller,
    /// Install into `build_root` instead of the function's own directory
    pub shared_dependencies: bool,
}

impl Assembler<'_> {
    /// Rebuild `build_root/<unit name>` from scratch.
    ///
    /// The function's own code must exist; force-includes are optional.
    pub fn assemble(&self, unit: &ResolvedUnit) -> Result<AssembledUnit, BuildError> {
        let target = self.build_root.join(unit.name());
        logger::step(&format!("Assembling {} in {}", unit.name(), target.display()));
        recreate_dir(&target)?;

        let source = join_relative(&self.root.join(unit.source_dir()), unit.module_dir());
        if !source.is_dir() {
            return Err(BuildError::SourceMissing {
                unit: unit.name().to_string(),
                path: source,
            });
        }

        let module_target = join_relative(&target, unit.module_dir());
        let mut files_copied = copy_tree_excluding(&source, &module_target, &[self.build_root])?;
        logger::debug(&format!(
            "Copied {} file(s) from {} to {}",
            files_copied,
            source.display(),
            module_target.display()
        ));

        let included: Vec<usize> = self
            .force_include
            .iter()
            .map(|include| overlay::apply(self.root, &target, include, OverlayScope::Unit))
            .collect();
        files_copied += included.iter().sum::<usize>();

        let requirements = self.write_requirements(unit, &module_target)?;
        if let Some(requirements) = &requirements {
            let install_target = if self.shared_dependencies {
                self.build_root
            } else {
                target.as_path()
            };
            logger::info(&format!(
                "Installing dependencies for {} into {}",
                unit.name(),
                install_target.display()
            ));
            self.installer.install(requirements, install_target)?;
        }

        Ok(AssembledUnit {
            target,
            files_copied,
            included,
            requirements,
        })
    }

    fn write_requirements(
        &self,
        unit: &ResolvedUnit,
        module_target: &Path,
    ) -> Result<Option<PathBuf>, BuildError> {
        let dependencies = self.dependencies.dependencies_for(&unit.module_name());
        if dependencies.is_empty() {
            return Ok(None);
        }

        let path = module_target.join(REQUIREMENTS_FILE);
        fs::write(&path, dependencies.join("\n"))?;
        logger::debug(&format!(
            "Wrote {} requirement(s) for {} to {}",
            dependencies.len(),
            unit.name(),
            path.display()
        ));
        Ok(Some(path))
    }
}
