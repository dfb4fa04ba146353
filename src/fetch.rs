//! # Fetcher
//!
//! Downloads every source of one family into its staging area and unpacks
//! the archives among them.
//!
//! All downloads of a family run concurrently, one thread per URL, and the
//! fetcher waits for every one of them before extracting anything. Archives
//! are then unpacked one at a time, ordered by [`ArchiveKind`], and deleted
//! once extracted so a later font scan never sees them. Files that are not
//! archives (a bare `.otf`, a `LICENSE`) stay in place.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use log::{debug, info, warn};

use crate::archive::{file_name_from_url, ArchiveKind};
use crate::error::{Error, Result};
use crate::operations::{Downloader, Extractor};

/// What a fetch left in the staging area.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Every file that was downloaded, in URL order.
    pub downloaded: Vec<PathBuf>,
    /// Archives that were unpacked and removed.
    pub extracted: Vec<PathBuf>,
    /// Downloads kept as-is: plain files and archives that failed to unpack.
    pub kept: Vec<PathBuf>,
    /// Archives that failed to unpack. Also listed in `kept`.
    pub failed: Vec<PathBuf>,
}

impl FetchOutcome {
    /// True when every archive was unpacked.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetch `urls` for `family` into `staging_dir`.
///
/// Any failed download fails the whole fetch, after the remaining downloads
/// have finished. Extraction problems only produce warnings.
pub fn fetch(
    family: &str,
    urls: &[&str],
    staging_dir: &Path,
    downloader: &dyn Downloader,
    extractor: &dyn Extractor,
) -> Result<FetchOutcome> {
    fs::create_dir_all(staging_dir)?;

    if urls.is_empty() {
        warn!("[{}] No source URLs configured, nothing to fetch", family);
        return Ok(FetchOutcome::default());
    }

    let targets = plan_downloads(urls, staging_dir)?;
    download_all(family, &targets, downloader)?;

    let mut outcome = FetchOutcome {
        downloaded: targets.iter().map(|(_, path)| path.clone()).collect(),
        ..FetchOutcome::default()
    };

    let mut archives: Vec<(ArchiveKind, &PathBuf)> = Vec::new();
    for path in &outcome.downloaded {
        match ArchiveKind::detect_path(path) {
            Some(kind) => archives.push((kind, path)),
            None => {
                warn!(
                    "[{}] {} is not a recognized archive, keeping it as-is",
                    family,
                    display_name(path)
                );
                outcome.kept.push(path.clone());
            }
        }
    }
    archives.sort();

    for (kind, archive) in archives {
        debug!("[{}] Extracting {} ({})", family, display_name(archive), kind);
        match extractor.extract(archive, kind, staging_dir) {
            Ok(()) => {
                fs::remove_file(archive)?;
                outcome.extracted.push(archive.clone());
            }
            Err(e) => {
                warn!("[{}] {}; leaving archive in place", family, e);
                outcome.kept.push(archive.clone());
                outcome.failed.push(archive.clone());
            }
        }
    }

    info!(
        "[{}] Fetched {} file(s), extracted {} archive(s)",
        family,
        outcome.downloaded.len(),
        outcome.extracted.len()
    );
    Ok(outcome)
}

/// Map each URL to a unique destination inside `staging_dir`.
///
/// Two URLs ending in the same file name would overwrite each other, so
/// later duplicates get a numeric prefix.
fn plan_downloads<'a>(urls: &[&'a str], staging_dir: &Path) -> Result<Vec<(&'a str, PathBuf)>> {
    let mut used = HashSet::new();
    let mut targets = Vec::with_capacity(urls.len());
    for (index, url) in urls.iter().enumerate() {
        let mut name = file_name_from_url(url)?;
        if !used.insert(name.clone()) {
            name = format!("{}-{}", index, name);
            used.insert(name.clone());
        }
        targets.push((*url, staging_dir.join(name)));
    }
    Ok(targets)
}

fn download_all(
    family: &str,
    targets: &[(&str, PathBuf)],
    downloader: &dyn Downloader,
) -> Result<()> {
    let results: Vec<Result<()>> = thread::scope(|scope| {
        let handles: Vec<_> = targets
            .iter()
            .map(|(url, dest)| {
                scope.spawn(move || {
                    debug!("[{}] Downloading {}", family, url);
                    downloader.download(url, dest)
                })
            })
            .collect();

        handles
            .into_iter()
            .zip(targets)
            .map(|(handle, (url, _))| {
                handle.join().unwrap_or_else(|_| {
                    Err(Error::Download {
                        url: url.to_string(),
                        message: "download worker panicked".to_string(),
                    })
                })
            })
            .collect()
    });

    // Report every failure, return the first
    let mut first_error = None;
    for result in results {
        if let Err(e) = result {
            warn!("[{}] {}", family, e);
            first_error.get_or_insert(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
