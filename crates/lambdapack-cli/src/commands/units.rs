use super::load_project;
use crate::builder::resolve_units;
use crate::errors::BuildError;
use crate::GlobalOpts;
use clap::Args;
use lambdapack_config::resolve_against;
use lambdapack_template::ResolvedUnit;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct UnitsArgs {
    /// SAM template to read (overrides the configured one)
    #[arg(long)]
    pub template: Option<PathBuf>,
}

/// One line per function: name, source directory, module directory
pub fn format_unit(unit: &ResolvedUnit) -> String {
    format!(
        "{}  {}  {}",
        unit.name(),
        unit.source_dir().display(),
        unit.module_dir().display()
    )
}

pub fn handle_units(args: &UnitsArgs, opts: &GlobalOpts) -> Result<(), BuildError> {
    let project = load_project(opts)?;
    let template = match &args.template {
        Some(template) => resolve_against(&project.root, template),
        None => project.build.template,
    };

    for unit in resolve_units(&template)? {
        println!("{}", format_unit(&unit));
    }
    Ok(())
}
