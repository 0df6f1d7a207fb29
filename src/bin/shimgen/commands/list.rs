//! `shimgen list` command

use anyhow::Result;

use super::load_catalog;
use crate::cli::ListArgs;
use crate::GlobalOptions;

pub fn execute(args: ListArgs, global_opts: &GlobalOptions) -> Result<()> {
    let catalog = load_catalog(global_opts)?;

    let mut names: Vec<&str> = match args.kind {
        Some(kind) => catalog.by_kind(kind).map(|p| p.name()).collect(),
        None => catalog.iter().map(|p| p.name()).collect(),
    };
    names.sort_unstable();

    for name in names {
        println!("{}", name);
    }

    Ok(())
}
