//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use shimgen::core::DescriptorKind;

/// shimgen - generate the nolyfill shim packages and their overrides
#[derive(Parser)]
#[command(name = "shimgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root (defaults to the nearest directory with a package.json)
    #[arg(long, global = true, value_name = "DIR", env = "SHIMGEN_ROOT")]
    pub root: Option<PathBuf>,

    /// Catalog file to use instead of the built-in catalog
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate packages, rewrite overrides, fetch sizes and install
    Sync(SyncArgs),

    /// Generate package directories only
    Generate(GenerateArgs),

    /// List catalog package names
    List(ListArgs),

    /// Print the override manifest as JSON
    Overrides(OverridesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct SyncArgs {
    /// Skip the package size lookup (the data module is not updated)
    #[arg(long)]
    pub offline: bool,

    /// Do not run the package manager afterwards
    #[arg(long)]
    pub no_install: bool,
}

#[derive(Args)]
pub struct GenerateArgs {}

#[derive(Args)]
pub struct ListArgs {
    /// Only list one kind (es-shim, single-file, manual)
    #[arg(long, value_name = "KIND")]
    pub kind: Option<DescriptorKind>,
}

#[derive(Args)]
pub struct OverridesArgs {
    /// Print workspace specs instead of registry specs
    #[arg(long)]
    pub workspace: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sync_flags() {
        let cli = Cli::parse_from(["shimgen", "sync", "--offline", "--no-install"]);
        match cli.command {
            Commands::Sync(args) => {
                assert!(args.offline);
                assert!(args.no_install);
            }
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["shimgen", "list", "--root", "/work", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("/work")));
        assert!(cli.catalog.is_none());
    }

    #[test]
    fn test_list_kind_is_parsed() {
        let cli = Cli::parse_from(["shimgen", "list", "--kind", "single-file"]);
        match cli.command {
            Commands::List(args) => assert_eq!(args.kind, Some(DescriptorKind::SingleFile)),
            _ => panic!("expected list"),
        }

        assert!(Cli::try_parse_from(["shimgen", "list", "--kind", "polyfill"]).is_err());
    }
}
