//! # Release Command Implementation
//!
//! `mathfonts release [VERSION] [--dry-run]` packages the output directory
//! into `mathfonts-<version>.zip` and `.tar.gz`.
//!
//! A real release cleans, rebuilds every family, archives, tags the
//! revision and removes the output directory. `--dry-run` archives a
//! synthetic placeholder family instead, and neither builds nor tags.

use anyhow::Result;
use clap::Args;

use mathfonts::catalog::CATALOG;
use mathfonts::defaults;
use mathfonts::error::Error;
use mathfonts::operations::GitVersionControl;
use mathfonts::orchestrator;
use mathfonts::output::{emoji, OutputConfig};
use mathfonts::release::{format_size, parse_version, Packager, ReleaseRequest};
use mathfonts::suggestions;

use super::build::run_build;
use super::ConfigArgs;

/// Build every family and package a versioned release
#[derive(Args, Debug)]
pub struct ReleaseArgs {
    /// Release version (MAJOR.MINOR.PATCH, optional `v` prefix). Defaults to
    /// the latest tag with its patch number incremented, or 1.0.0.
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,

    /// Package a placeholder family without building, tagging or touching
    /// the output directory.
    #[arg(long)]
    pub dry_run: bool,

    /// Build up to N families at once.
    #[arg(short = 'j', long, value_name = "N", env = "MATHFONTS_JOBS")]
    pub jobs: Option<usize>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute the `release` command.
pub fn execute(args: ReleaseArgs, out: &OutputConfig) -> Result<()> {
    if let Some(version) = &args.version {
        if let Err(e) = parse_version(version) {
            let detail = match &e {
                Error::Version { message, .. } => message.clone(),
                other => other.to_string(),
            };
            return Err(suggestions::invalid_version(version, &detail));
        }
    }

    let config = args
        .config
        .to_config()
        .with_jobs(args.jobs.unwrap_or_else(defaults::default_jobs));
    let vcs = GitVersionControl::new(&config.root);
    let request = ReleaseRequest {
        version: args.version.clone(),
        dry_run: args.dry_run,
    };

    println!(
        "{} Preparing {}release",
        emoji(out, "📦", "[RELEASE]"),
        if args.dry_run { "dry-run " } else { "" }
    );

    let outcome = Packager::new(&config, &vcs)
        .run(&request, || {
            orchestrator::clean(&config)?;
            let families: Vec<_> = CATALOG.iter().collect();
            run_build(&config, &families, out)
                .map(|_| ())
                .map_err(|e| Error::Release {
                    message: format!("build failed: {}", e),
                })
        })
        .map_err(|e| match e {
            Error::Release { ref message }
                if message.contains("does not exist") && !config.dist_dir.exists() =>
            {
                suggestions::output_missing(&config.dist_dir)
            }
            other => other.into(),
        })?;

    println!(
        "{} Release {}{}",
        emoji(out, "✅", "[OK]"),
        outcome.version.tag(),
        if outcome.dry_run { " (dry run)" } else { "" }
    );
    println!(
        "   {} ({})",
        outcome.zip_path.display(),
        format_size(outcome.zip_size)
    );
    println!(
        "   {} ({})",
        outcome.tar_path.display(),
        format_size(outcome.tar_size)
    );
    println!("   {} woff2 font(s) archived", outcome.stats.woff2_count);
    println!("   Release notes: {}", outcome.notes_path.display());

    println!(
        "\n{} {}:",
        emoji(out, "📋", "[NEXT]"),
        if outcome.dry_run {
            "A real release would also"
        } else {
            "Next steps"
        }
    );
    for step in outcome.follow_up() {
        println!("   - {}", step);
    }
    Ok(())
}
