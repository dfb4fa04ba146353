//! # Clean / Distclean Command Implementation
//!
//! `mathfonts clean` removes staging directories, download stamps and the
//! output directory. `mathfonts distclean` also removes the whole staging
//! root, including release bundles and notes.

use anyhow::Result;
use clap::Args;

use mathfonts::orchestrator;
use mathfonts::output::{emoji, OutputConfig};

use super::ConfigArgs;

/// Remove staging and output directories
#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute the `clean` command.
pub fn execute(args: CleanArgs, out: &OutputConfig) -> Result<()> {
    let config = args.config.to_config();
    orchestrator::clean(&config)?;
    println!(
        "{} Removed staging directories, download stamps and {}",
        emoji(out, "🧹", "[CLEAN]"),
        config.dist_dir.display()
    );
    Ok(())
}

/// Execute the `distclean` command.
pub fn execute_distclean(args: CleanArgs, out: &OutputConfig) -> Result<()> {
    let config = args.config.to_config();
    orchestrator::distclean(&config)?;
    println!(
        "{} Removed {} and {}",
        emoji(out, "🧹", "[CLEAN]"),
        config.tmp_dir.display(),
        config.dist_dir.display()
    );
    Ok(())
}
