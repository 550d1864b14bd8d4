use super::load_project;
use crate::builder::installer::PipInstaller;
use crate::builder::packager::SamCli;
use crate::builder::{BuildOutcome, Builder};
use crate::GlobalOpts;
use clap::Args;
use lambdapack_config::{resolve_against, Project};
use lambdapack_logger as logger;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Build output directory (overrides the configured one)
    #[arg(long)]
    pub directory: Option<PathBuf>,
    /// SAM template to build (overrides the configured one)
    #[arg(long)]
    pub template: Option<PathBuf>,
    /// Trust `sam build` output as-is and skip per-function assembly
    #[arg(long)]
    pub use_sam: bool,
}

impl BuildArgs {
    /// Command line flags win over pyproject.toml
    pub fn apply(&self, project: &mut Project) {
        if let Some(directory) = &self.directory {
            project.build.directory = resolve_against(&project.root, directory);
        }
        if let Some(template) = &self.template {
            project.build.template = resolve_against(&project.root, template);
        }
        if self.use_sam {
            project.build.use_sam = true;
        }
    }
}

pub fn handle_build(args: &BuildArgs, opts: &GlobalOpts) -> BuildOutcome {
    let mut project = match load_project(opts) {
        Ok(project) => project,
        Err(e) => return BuildOutcome::Aborted(e.abort_message()),
    };
    args.apply(&mut project);

    logger::info(&format!(
        "Building {} from {}",
        project.metadata.name,
        project.build.template.display()
    ));

    let packager = SamCli::new(project.build.sam_exec.clone());
    let installer = PipInstaller::new(project.build.pip_exec.clone());
    Builder {
        root: &project.root,
        config: &project.build,
        dependencies: &project.metadata,
        packager: &packager,
        installer: &installer,
    }
    .build()
}
