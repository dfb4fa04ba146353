//! Default values for mathfonts configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;
use std::time::Duration;

/// Minimum number of families built in parallel.
pub const MIN_JOBS: usize = 4;

/// Default per-download timeout in seconds.
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Default Python interpreter used for the font conversion engine.
pub const PYTHON: &str = "python3";

/// Returns the default project root: the current working directory.
///
/// Falls back to `.` if the current directory cannot be determined.
///
/// This can be overridden by the `--root` CLI flag or the `MATHFONTS_ROOT`
/// environment variable.
pub fn default_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the default worker count: `max(4, available cores)`.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(MIN_JOBS)
}

/// Returns the default per-download timeout.
pub fn default_download_timeout() -> Duration {
    Duration::from_secs(DOWNLOAD_TIMEOUT_SECS)
}
