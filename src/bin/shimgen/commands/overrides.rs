//! `shimgen overrides` command

use anyhow::Result;
use serde_json::Value;

use super::load_catalog;
use crate::cli::OverridesArgs;
use crate::GlobalOptions;
use shimgen::ops::overrides;
use shimgen::util::{Config, GlobalContext};

pub fn execute(args: OverridesArgs, global_opts: &GlobalOptions) -> Result<()> {
    let catalog = load_catalog(global_opts)?;

    // Outside a project the scope falls back to the global config
    let ctx = GlobalContext::new()?.with_root(global_opts.root.clone());
    let config = match ctx.find_project_root() {
        Ok(root) => ctx.load_config(&root)?,
        Err(_) => Config::load_or_default(&ctx.config_path())?,
    };

    catalog.validate(config.scope())?;
    let manifest = overrides(&catalog, &config)?;

    let specs = if args.workspace {
        &manifest.workspace_overrides
    } else {
        &manifest.direct_overrides
    };
    let object: Value = specs
        .iter()
        .map(|(name, spec)| (name.clone(), Value::String(spec.clone())))
        .collect::<serde_json::Map<_, _>>()
        .into();

    println!("{}", serde_json::to_string_pretty(&object)?);

    Ok(())
}
