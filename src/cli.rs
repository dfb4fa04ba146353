//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::WriteStyle;
use log::LevelFilter;

use crate::commands;
use mathfonts::output::OutputConfig;

/// Math fonts for the web: fetch, normalize, convert and package
#[derive(Parser, Debug)]
#[command(name = "mathfonts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(
        long,
        global = true,
        value_name = "WHEN",
        default_value = "auto",
        value_parser = ["always", "never", "auto"]
    )]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,

    /// Hide the progress bar
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build one or more font families
    Build(commands::build::BuildArgs),

    /// Build every font family in the catalog
    BuildAll(commands::build_all::BuildAllArgs),

    /// Verify that required external tools and libraries are installed
    CheckDeps(commands::check_deps::CheckDepsArgs),

    /// Remove staging directories, download stamps and the output directory
    Clean(commands::clean::CleanArgs),

    /// Like clean, and also remove release bundles and notes
    Distclean(commands::clean::CleanArgs),

    /// Build every family and package a versioned release
    Release(commands::release::ReleaseArgs),

    /// List the font families in the catalog
    List(commands::list::ListArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let out = OutputConfig::from_env_and_flag(&self.color).with_quiet(self.quiet);
        init_logging(&self.log_level, &out);

        match self.command {
            Commands::Build(args) => commands::build::execute(args, &out),
            Commands::BuildAll(args) => commands::build_all::execute(args, &out),
            Commands::CheckDeps(args) => commands::check_deps::execute(args, &out),
            Commands::Clean(args) => commands::clean::execute(args, &out),
            Commands::Distclean(args) => commands::clean::execute_distclean(args, &out),
            Commands::Release(args) => commands::release::execute(args, &out),
            Commands::List(args) => commands::list::execute(args),
        }
    }
}

/// Initialise `env_logger` at `level`. `RUST_LOG` still takes precedence.
fn init_logging(level: &str, out: &OutputConfig) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(filter)
        .format_timestamp(None)
        .format_target(false)
        .write_style(if out.use_color {
            WriteStyle::Always
        } else {
            WriteStyle::Never
        })
        .parse_default_env();
    // A second initialisation (e.g. in tests) keeps the first logger
    let _ = builder.try_init();
}
