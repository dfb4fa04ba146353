//! # Build-All Command Implementation
//!
//! `mathfonts build-all` builds every family in the catalog, one at a time by
//! default, or several at once with `--parallel` / `-j N`.

use anyhow::Result;
use clap::Args;

use mathfonts::catalog::CATALOG;
use mathfonts::output::OutputConfig;

use super::build::run_build;
use super::{ConfigArgs, JobArgs};

/// Build every font family in the catalog
#[derive(Args, Debug)]
pub struct BuildAllArgs {
    #[command(flatten)]
    pub jobs: JobArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute the `build-all` command.
pub fn execute(args: BuildAllArgs, out: &OutputConfig) -> Result<()> {
    let config = args.config.to_config().with_jobs(args.jobs.resolve());
    let families: Vec<_> = CATALOG.iter().collect();
    run_build(&config, &families, out).map(|_| ())
}
