//! # CLI Command Implementations
//!
//! One file per subcommand of the `mathfonts` tool. Each contains an `Args`
//! struct derived with `clap` and an `execute` function that calls into the
//! `mathfonts` library.
//!
//! Options shared by several commands live here: [`ConfigArgs`] turns the
//! path, interpreter and timeout flags (each with a `MATHFONTS_*` fallback)
//! into a [`BuildConfig`], and [`JobArgs`] decides the worker count.

pub mod build;
pub mod build_all;
pub mod check_deps;
pub mod clean;
pub mod list;
pub mod release;

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use mathfonts::config::BuildConfig;
use mathfonts::defaults;

/// Locations and tools used by a build.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Project root. Staging and output directories default to `tmp/` and
    /// `dist/` below it.
    #[arg(long, value_name = "DIR", env = "MATHFONTS_ROOT")]
    pub root: Option<PathBuf>,

    /// Staging directory for downloads, stamps and release bundles.
    #[arg(long, value_name = "DIR", env = "MATHFONTS_TMP_DIR")]
    pub tmp_dir: Option<PathBuf>,

    /// Output directory holding one subdirectory per family.
    #[arg(long, value_name = "DIR", env = "MATHFONTS_DIST_DIR")]
    pub dist_dir: Option<PathBuf>,

    /// Python interpreter with fontTools installed.
    #[arg(long, value_name = "PATH", env = "MATHFONTS_PYTHON")]
    pub python: Option<PathBuf>,

    /// Per-download time limit in seconds.
    #[arg(long, value_name = "SECONDS", env = "MATHFONTS_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl ConfigArgs {
    pub fn to_config(&self) -> BuildConfig {
        let root = self.root.clone().unwrap_or_else(defaults::default_root);
        let mut config = BuildConfig::new(root);
        if let Some(dir) = &self.tmp_dir {
            config = config.with_tmp_dir(dir);
        }
        if let Some(dir) = &self.dist_dir {
            config = config.with_dist_dir(dir);
        }
        if let Some(python) = &self.python {
            config = config.with_python(python);
        }
        if let Some(seconds) = self.timeout {
            config = config.with_download_timeout(Duration::from_secs(seconds));
        }
        config
    }
}

/// Worker count for family builds.
#[derive(Args, Debug, Clone, Default)]
pub struct JobArgs {
    /// Build families in parallel with the default worker count.
    #[arg(long)]
    pub parallel: bool,

    /// Build up to N families at once.
    #[arg(short = 'j', long, value_name = "N", env = "MATHFONTS_JOBS")]
    pub jobs: Option<usize>,
}

impl JobArgs {
    /// Explicit `-j` wins, `--parallel` uses the default, otherwise one
    /// family at a time.
    pub fn resolve(&self) -> usize {
        match (self.jobs, self.parallel) {
            (Some(jobs), _) => jobs.max(1),
            (None, true) => defaults::default_jobs(),
            (None, false) => 1,
        }
    }
}
