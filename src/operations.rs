//! # Capability Interfaces
//!
//! The pipeline never calls external tools directly. Each outside
//! collaborator is reached through a trait so the orchestrator and the
//! release packager can be exercised with fakes:
//!
//! - **`Downloader`**: fetches one URL to one local file.
//! - **`Extractor`**: unpacks one archive into a directory.
//! - **`FontConverter`**: turns source fonts in a directory into web
//!   formats written next to them.
//! - **`VersionControl`**: reads the latest release tag and creates new ones.
//!
//! The `System*` implementations wrap the functions in [`crate::tools`] and
//! [`crate::git`]. `Toolchain` bundles the three build-time capabilities so
//! a single value can be shared by every family pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::archive::ArchiveKind;
use crate::config::BuildConfig;
use crate::error::Result;

/// Fetches remote resources.
pub trait Downloader: Send + Sync {
    /// Download `url` into the file `dest`. The parent directory exists.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Unpacks archives.
pub trait Extractor: Send + Sync {
    /// Unpack `archive` of the given kind into `dest_dir`.
    fn extract(&self, archive: &Path, kind: ArchiveKind, dest_dir: &Path) -> Result<()>;
}

/// Produces web-optimized font formats.
pub trait FontConverter: Send + Sync {
    /// Convert `fonts` (names relative to `dir`), writing results into `dir`.
    fn convert(&self, dir: &Path, fonts: &[String]) -> Result<()>;
}

/// Reads and writes release tags.
pub trait VersionControl: Send + Sync {
    /// Most recent tag, or `None` if the repository has never been tagged.
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Create an annotated tag at the current revision.
    fn create_tag(&self, tag: &str, message: &str) -> Result<()>;
}

/// `curl`-backed downloader with a per-transfer time limit.
pub struct CurlDownloader {
    timeout: Duration,
}

impl CurlDownloader {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Downloader for CurlDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        crate::tools::download(url, dest, self.timeout)
    }
}

/// Extractor using the system archivers.
pub struct SystemExtractor;

impl Extractor for SystemExtractor {
    fn extract(&self, archive: &Path, kind: ArchiveKind, dest_dir: &Path) -> Result<()> {
        crate::tools::extract(archive, kind, dest_dir)
    }
}

/// fontTools-based converter run under a Python interpreter.
pub struct PythonConverter {
    python: PathBuf,
}

impl PythonConverter {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl FontConverter for PythonConverter {
    fn convert(&self, dir: &Path, fonts: &[String]) -> Result<()> {
        crate::tools::convert_fonts(&self.python, dir, fonts)
    }
}

/// Version control through the `git` command in a working tree.
pub struct GitVersionControl {
    repo_dir: PathBuf,
}

impl GitVersionControl {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }
}

impl VersionControl for GitVersionControl {
    fn latest_tag(&self) -> Result<Option<String>> {
        crate::git::latest_tag(&self.repo_dir)
    }

    fn create_tag(&self, tag: &str, message: &str) -> Result<()> {
        crate::git::create_annotated_tag(&self.repo_dir, tag, message)
    }
}

/// The capabilities a family pipeline needs.
pub struct Toolchain {
    pub downloader: Box<dyn Downloader>,
    pub extractor: Box<dyn Extractor>,
    pub converter: Box<dyn FontConverter>,
}

impl Toolchain {
    /// Toolchain backed by the real system tools.
    pub fn system(config: &BuildConfig) -> Self {
        Self {
            downloader: Box::new(CurlDownloader::new(config.download_timeout)),
            extractor: Box::new(SystemExtractor),
            converter: Box::new(PythonConverter::new(config.python.clone())),
        }
    }

    /// Toolchain with caller-supplied implementations.
    pub fn with_operations(
        downloader: Box<dyn Downloader>,
        extractor: Box<dyn Extractor>,
        converter: Box<dyn FontConverter>,
    ) -> Self {
        Self {
            downloader,
            extractor,
            converter,
        }
    }
}
