//! # Build Command Implementation
//!
//! `mathfonts build <FAMILY>...` runs the family pipeline for the named
//! families. Unknown names fail before any work starts. The shared
//! [`run_build`] is also used by `build-all` and `release`.

use anyhow::Result;
use clap::Args;

use mathfonts::catalog::{self, FamilySpec};
use mathfonts::config::BuildConfig;
use mathfonts::deps;
use mathfonts::error::Error;
use mathfonts::operations::Toolchain;
use mathfonts::orchestrator::{BuildOrchestrator, BuildSummary};
use mathfonts::output::{emoji, family_progress, family_status, OutputConfig};
use mathfonts::suggestions;

use super::{ConfigArgs, JobArgs};

/// Build one or more font families
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Families to build, as listed by `mathfonts list`.
    #[arg(required = true, value_name = "FAMILY")]
    pub families: Vec<String>,

    #[command(flatten)]
    pub jobs: JobArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute the `build` command.
pub fn execute(args: BuildArgs, out: &OutputConfig) -> Result<()> {
    let families = select_families(&args.families)?;
    let config = args.config.to_config().with_jobs(args.jobs.resolve());
    run_build(&config, &families, out).map(|_| ())
}

/// Resolve family names, turning an unknown name into a hinted error.
pub fn select_families<S: AsRef<str>>(names: &[S]) -> Result<Vec<&'static FamilySpec>> {
    catalog::select(names).map_err(|e| match e {
        Error::UnknownFamily { name, .. } => suggestions::unknown_family(&name, &catalog::names()),
        other => other.into(),
    })
}

/// Verify dependencies, build `families` and print the summary.
///
/// Returns an error after the whole batch has run if any family failed.
pub fn run_build(
    config: &BuildConfig,
    families: &[&FamilySpec],
    out: &OutputConfig,
) -> Result<BuildSummary> {
    let missing = deps::check_dependencies(&config.python).missing_required();
    if !missing.is_empty() {
        return Err(suggestions::missing_dependencies(&missing));
    }

    let orchestrator = BuildOrchestrator::new(config.clone(), Toolchain::system(config));
    let progress = family_progress(out, families.len());
    let summary = orchestrator.build(families, |report| {
        progress.set_message(report.name.clone());
        progress.inc(1);
    })?;
    progress.finish_and_clear();

    println!();
    print!(
        "{}",
        summary.render_with(|succeeded, cell| family_status(out, succeeded, cell))
    );

    if summary.all_succeeded() {
        println!(
            "{} Built {} famil{} into {}",
            emoji(out, "✅", "[OK]"),
            summary.total(),
            if summary.total() == 1 { "y" } else { "ies" },
            orchestrator.config().dist_dir.display()
        );
        Ok(summary)
    } else {
        let failed: Vec<&str> = summary
            .failed()
            .iter()
            .map(|report| report.name.as_str())
            .collect();
        Err(suggestions::families_failed(&failed, summary.total()))
    }
}
