//! # mathfonts
//!
//! Build pipeline for a fixed catalog of open-source math fonts: fetch the
//! upstream archives, collect the font files, normalize each family's
//! license into one canonical `LICENSE`, produce WOFF/WOFF2 versions and
//! package everything into a versioned release bundle.
//!
//! The `mathfonts` binary is a thin `clap` wrapper over this library.
//!
//! ## Quick Example
//!
//! ```no_run
//! use mathfonts::catalog;
//! use mathfonts::config::BuildConfig;
//! use mathfonts::operations::Toolchain;
//! use mathfonts::orchestrator::BuildOrchestrator;
//!
//! let config = BuildConfig::new(".").with_jobs(4);
//! let toolchain = Toolchain::system(&config);
//! let families = catalog::select(&["STIX", "XITS"]).unwrap();
//!
//! let summary = BuildOrchestrator::new(config, toolchain)
//!     .build(&families, |_| {})
//!     .unwrap();
//! println!("{}", summary.render());
//! ```
//!
//! ## Core Concepts
//!
//! - **Catalog (`catalog`)**: every family with its source URLs and, where
//!   needed, the metadata for a generated Open Font License.
//! - **Capabilities (`operations`)**: downloads, archive extraction, font
//!   conversion and release tagging sit behind traits, with system
//!   implementations in `tools` and `git`.
//! - **Family pipeline (`pipeline`)**: fetch, collect, license, compress,
//!   then drop the staging tree. Built from `fetch`, `collect`, `license`
//!   and `compress`.
//! - **Orchestrator (`orchestrator`)**: runs family pipelines on a bounded
//!   worker pool and summarizes the results. Download stamps (`stamp`) make
//!   repeated builds skip the network.
//! - **Release (`release`)**: archives the output tree as zip and tar.gz,
//!   writes release notes and tags the revision.
//!
//! ## Layout on disk
//!
//! ```text
//! <root>/tmp/<family>/              staging, removed after each family
//! <root>/tmp/<family>-downloaded    download stamp
//! <root>/dist/<family>/             fonts, LICENSE, docs
//! <root>/tmp/mathfonts-<v>.zip      release bundles and notes
//! ```

pub mod archive;
pub mod catalog;
pub mod collect;
pub mod compress;
pub mod config;
pub mod defaults;
pub mod deps;
pub mod error;
pub mod fetch;
pub mod git;
pub mod license;
pub mod operations;
pub mod orchestrator;
pub mod output;
pub mod pipeline;
pub mod release;
pub mod stamp;
pub mod suggestions;
pub mod tools;

#[cfg(test)]
mod archive_proptest;

#[cfg(test)]
mod test_support;
