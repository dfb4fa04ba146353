//! # mathfonts CLI
//!
//! Binary entry point for the `mathfonts` command-line tool. It parses the
//! command line with `clap` and dispatches to one of the subcommands in
//! `commands`; the build logic itself lives in the `mathfonts` library.
//!
//! Exit codes: 0 on success, 1 when a command fails (including a build in
//! which any family failed), 2 for usage errors reported by `clap`.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
