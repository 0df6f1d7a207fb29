//! `shimgen generate` command

use anyhow::Result;

use super::Project;
use crate::cli::GenerateArgs;
use crate::GlobalOptions;
use shimgen::ops::{generate_packages, prepare};

pub fn execute(_args: GenerateArgs, global_opts: &GlobalOptions) -> Result<()> {
    let project = Project::load(global_opts)?;

    let base = prepare(&project.root, &project.catalog, &project.config)?;
    let outcomes = generate_packages(&project.root, &base, &project.catalog, &project.config)?;

    let written: usize = outcomes.iter().map(|o| o.written).sum();
    let files: usize = outcomes.iter().map(|o| o.files).sum();

    eprintln!(
        "Generated {} packages: {} files written, {} unchanged",
        outcomes.len(),
        written,
        files - written
    );

    Ok(())
}
