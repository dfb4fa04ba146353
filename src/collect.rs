//! Font Collector: copy every font binary out of a staging tree into the
//! flat output directory of its family.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::Result;

/// Font container suffixes, originals first.
pub const FONT_EXTENSIONS: &[&str] = &["otf", "ttf", "woff", "woff2"];

/// Suffixes of original fonts fed to the conversion engine.
pub const SOURCE_EXTENSIONS: &[&str] = &["otf", "ttf"];

/// Whether `path` carries one of `extensions` (case-insensitive).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Copy every font under `staging_dir` into `output_dir`, returning how
/// many were copied.
///
/// The directory structure is flattened. Fonts sharing a file name overwrite
/// each other in traversal order. A file that fails to copy is skipped with
/// a warning.
pub fn collect(family: &str, staging_dir: &Path, output_dir: &Path) -> Result<usize> {
    fs::create_dir_all(output_dir)?;

    let mut count = 0;
    if staging_dir.is_dir() {
        for entry in WalkDir::new(staging_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("[{}] Skipping unreadable entry: {}", family, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !has_extension(entry.path(), FONT_EXTENSIONS) {
                continue;
            }
            let Some(name) = entry.path().file_name() else {
                continue;
            };
            match fs::copy(entry.path(), output_dir.join(name)) {
                Ok(_) => {
                    debug!("[{}] Collected {}", family, name.to_string_lossy());
                    count += 1;
                }
                Err(e) => warn!(
                    "[{}] Failed to copy {}: {}",
                    family,
                    entry.path().display(),
                    e
                ),
            }
        }
    }

    if count == 0 {
        warn!("[{}] No font files found in {}", family, staging_dir.display());
    } else {
        debug!("[{}] Collected {} font file(s)", family, count);
    }
    Ok(count)
}
