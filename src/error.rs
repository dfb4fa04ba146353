//! # Error Handling
//!
//! This module defines the centralized error type for the `mathfonts` build
//! pipeline. It uses the `thiserror` library to describe every anticipated
//! failure mode with enough context (family, URL, tool, archive) to explain
//! what went wrong without a backtrace.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum covering all failures raised by the library.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Not every error is fatal. The pipeline decides severity:
//!
//! - Environment errors (`MissingDependencies`) abort an
//!   invocation before any work starts.
//! - Per-URL fetch errors (`Download`) fail a single family; the batch
//!   continues with the remaining families.
//! - Extraction errors (`Extraction`) are downgraded to warnings by the
//!   fetcher and leave the archive in place.
//! - Release structural errors (`Release`, `Version`) abort the release.

use thiserror::Error;

/// Main error type for mathfonts operations
#[derive(Error, Debug)]
pub enum Error {
    /// A family name was requested that is not part of the catalog.
    #[error("Unknown font family '{name}'. Available families: {available}")]
    UnknownFamily { name: String, available: String },

    /// A family name cannot be used as a directory name.
    #[error("Invalid font family name '{name}': {message}")]
    InvalidFamilyName { name: String, message: String },

    /// A download failed or produced no file.
    #[error("Download failed for {url}: {message}")]
    Download { url: String, message: String },

    /// An archive could not be unpacked.
    #[error("Extraction failed for {archive}: {message}")]
    Extraction { archive: String, message: String },

    /// The font conversion engine failed for an output directory.
    #[error("Font conversion failed in {dir}: {message}")]
    Conversion { dir: String, message: String },

    /// One or more required external tools or libraries are missing.
    #[error("Missing dependencies: {}", missing.join(", "))]
    MissingDependencies { missing: Vec<String> },

    /// A Git command exited unsuccessfully.
    #[error("Git command failed: {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// A release version string could not be understood.
    #[error("Invalid release version '{version}': {message}")]
    Version { version: String, message: String },

    /// A structural failure while packaging a release.
    #[error("Release error: {message}")]
    Release { message: String },

    /// A download stamp could not be read or written.
    #[error("Stamp error for {family}: {message}")]
    Stamp { family: String, message: String },

    /// The family worker pool could not be started.
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A semantic versioning parsing error, wrapped from `semver::Error`.
    #[error("Semver parsing error: {0}")]
    Semver(#[from] semver::Error),

    /// A ZIP archive error, wrapped from `zip::result::ZipError`.
    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
