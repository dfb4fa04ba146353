//! # Build Configuration
//!
//! `BuildConfig` carries every setting the orchestrator and the release
//! packager need. It is built once by the CLI layer (from flags and their
//! `MATHFONTS_*` environment fallbacks) and passed down explicitly; nothing
//! below the CLI reads process-wide state.
//!
//! ## Layout
//!
//! ```text
//! <root>/tmp/<family>/              staging area (ephemeral)
//! <root>/tmp/<family>-downloaded    download stamp
//! <root>/dist/<family>/             output directory
//! <root>/tmp/mathfonts-<v>.zip      release bundle
//! <root>/tmp/mathfonts-<v>.tar.gz   release bundle
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::defaults;

/// Name of the staging directory relative to the root.
pub const TMP_DIR_NAME: &str = "tmp";

/// Name of the output directory relative to the root.
pub const DIST_DIR_NAME: &str = "dist";

/// Suffix of download stamp files.
pub const STAMP_SUFFIX: &str = "-downloaded";

/// Prefix of release bundle file names.
pub const BUNDLE_PREFIX: &str = "mathfonts";

/// Configuration for a build or release invocation.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root. Relative defaults below are resolved against it.
    pub root: PathBuf,
    /// Staging directory holding per-family scratch trees and stamps.
    pub tmp_dir: PathBuf,
    /// Aggregate output directory holding one subdirectory per family.
    pub dist_dir: PathBuf,
    /// Python interpreter running the font conversion engine.
    pub python: PathBuf,
    /// Maximum number of families processed in parallel.
    pub jobs: usize,
    /// Upper bound on a single download.
    pub download_timeout: Duration,
}

impl BuildConfig {
    /// Create a configuration rooted at `root` with every other setting at
    /// its default.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            tmp_dir: root.join(TMP_DIR_NAME),
            dist_dir: root.join(DIST_DIR_NAME),
            python: PathBuf::from(defaults::PYTHON),
            jobs: defaults::default_jobs(),
            download_timeout: defaults::default_download_timeout(),
            root,
        }
    }

    /// Override the staging directory. Relative paths resolve against the root.
    pub fn with_tmp_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.tmp_dir = self.resolve(dir.as_ref());
        self
    }

    /// Override the output directory. Relative paths resolve against the root.
    pub fn with_dist_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dist_dir = self.resolve(dir.as_ref());
        self
    }

    /// Override the Python interpreter.
    pub fn with_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.python = python.into();
        self
    }

    /// Override the worker count. Zero is treated as one.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Override the per-download timeout.
    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Staging area for one family.
    pub fn staging_dir(&self, family: &str) -> PathBuf {
        self.tmp_dir.join(family)
    }

    /// Output directory for one family.
    pub fn output_dir(&self, family: &str) -> PathBuf {
        self.dist_dir.join(family)
    }

    /// Release bundle path for a bare numeric version and an extension such
    /// as `zip` or `tar.gz`.
    pub fn bundle_path(&self, version: &str, extension: &str) -> PathBuf {
        self.tmp_dir
            .join(format!("{}-{}.{}", BUNDLE_PREFIX, version, extension))
    }

    /// Synthetic output directory used by dry-run releases.
    pub fn dry_run_dist_dir(&self) -> PathBuf {
        self.tmp_dir.join("dist-dry-run")
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
