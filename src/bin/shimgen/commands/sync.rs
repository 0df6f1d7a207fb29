//! `shimgen sync` command

use anyhow::Result;

use super::Project;
use crate::cli::SyncArgs;
use crate::GlobalOptions;
use shimgen::ops::{sync, ProcessInstaller, SyncOptions};
use shimgen::sources::HttpSizeFetcher;

pub fn execute(args: SyncArgs, global_opts: &GlobalOptions) -> Result<()> {
    let project = Project::load(global_opts)?;
    let config = &project.config;

    let fetcher = HttpSizeFetcher::new(config.timeout())?;
    let installer = ProcessInstaller::new(config.install_program(), config.install_args());

    let opts = SyncOptions {
        offline: args.offline,
        no_install: args.no_install,
    };

    let report = sync(
        &project.root,
        &project.catalog,
        config,
        &fetcher,
        &installer,
        opts,
    )?;

    eprintln!(
        "Synced {} packages ({} files written), {} overrides",
        report.packages, report.files_written, report.overrides
    );
    if report.sizes_fetched > 0 {
        eprintln!("Fetched {} package sizes", report.sizes_fetched);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse_sync_args(args: &[&str]) -> SyncArgs {
        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            sync: SyncArgs,
        }
        TestCli::parse_from(args).sync
    }

    #[test]
    fn test_sync_args_defaults() {
        let args = parse_sync_args(&["test"]);
        assert!(!args.offline);
        assert!(!args.no_install);
    }

    #[test]
    fn test_sync_args_no_install() {
        let args = parse_sync_args(&["test", "--no-install"]);
        assert!(args.no_install);
        assert!(!args.offline);
    }
}
