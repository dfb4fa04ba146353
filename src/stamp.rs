//! Download stamps for incremental builds.
//!
//! A stamp file `<tmp>/<family>-downloaded` records that a family's fetch
//! phase completed. Its content is the SHA-256 digest of the family's URL
//! list, so editing a family's sources in the catalog invalidates the stamp
//! automatically. A stamp with any other content (including the empty
//! marker older builds wrote) is treated as stale.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Reads and writes download stamps in one directory.
#[derive(Debug, Clone)]
pub struct StampStore {
    dir: PathBuf,
}

impl StampStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the stamp for `family`.
    pub fn path(&self, family: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", family, crate::config::STAMP_SUFFIX))
    }

    /// Whether `family` was fetched from exactly `urls`.
    pub fn is_fresh(&self, family: &str, urls: &[&str]) -> Result<bool> {
        match fs::read_to_string(self.path(family)) {
            Ok(content) => Ok(content.trim() == digest(urls)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Stamp {
                family: family.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Record a completed fetch of `urls` for `family`.
    pub fn mark(&self, family: &str, urls: &[&str]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(family), format!("{}\n", digest(urls))).map_err(|e| Error::Stamp {
            family: family.to_string(),
            message: e.to_string(),
        })
    }

    /// Forget `family`'s stamp. Missing stamps are fine.
    pub fn clear(&self, family: &str) -> Result<()> {
        remove_if_present(&self.path(family))
    }
}

/// Hex SHA-256 of the newline-joined URL list.
pub fn digest(urls: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(urls.join("\n").as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
