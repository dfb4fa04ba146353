//! # Check-Deps Command Implementation
//!
//! `mathfonts check-deps` probes every external tool and Python module the
//! build relies on, prints one line per dependency and exits non-zero when a
//! required one is missing.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use mathfonts::defaults;
use mathfonts::deps::{check_dependencies, Requirement};
use mathfonts::output::{emoji, OutputConfig};
use mathfonts::suggestions;

/// Verify that required external tools and libraries are installed
#[derive(Args, Debug)]
pub struct CheckDepsArgs {
    /// Python interpreter with fontTools installed.
    #[arg(long, value_name = "PATH", env = "MATHFONTS_PYTHON", default_value = defaults::PYTHON)]
    pub python: PathBuf,
}

/// Execute the `check-deps` command.
pub fn execute(args: CheckDepsArgs, out: &OutputConfig) -> Result<()> {
    println!(
        "{} Checking dependencies...",
        emoji(out, "🔍", "[SCAN]")
    );

    let report = check_dependencies(&args.python);
    for check in &report.checks {
        let marker = match (check.present, check.requirement) {
            (true, _) => emoji(out, "✅", "[OK]"),
            (false, Requirement::Optional) => emoji(out, "⚠️", "[WARN]"),
            (false, Requirement::Required) => emoji(out, "❌", "[ERR]"),
        };
        let optional = if check.requirement == Requirement::Optional {
            ", optional"
        } else {
            ""
        };
        println!("   {} {} ({}{})", marker, check.name, check.purpose, optional);
    }

    let missing = report.missing_required();
    if !missing.is_empty() {
        return Err(suggestions::missing_dependencies(&missing));
    }

    println!(
        "{} All required dependencies are available",
        emoji(out, "✅", "[OK]")
    );
    Ok(())
}
