//! Archive recognition and download file naming.

use std::fmt;
use std::path::Path;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{Error, Result};

/// Archive formats the fetcher knows how to unpack.
///
/// The declaration order is the order in which a family's downloads are
/// extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArchiveKind {
    Zip,
    TarGz,
    TarBz2,
    Tar,
    SevenZip,
    Rar,
}

impl ArchiveKind {
    /// All recognized kinds, in extraction order.
    pub const ALL: [ArchiveKind; 6] = [
        ArchiveKind::Zip,
        ArchiveKind::TarGz,
        ArchiveKind::TarBz2,
        ArchiveKind::Tar,
        ArchiveKind::SevenZip,
        ArchiveKind::Rar,
    ];

    /// Recognize an archive from its file name (case-insensitive).
    ///
    /// Compound suffixes are checked before their plain counterparts so that
    /// `fonts.tar.gz` is a `TarGz` rather than an unknown `.gz` file.
    pub fn detect(file_name: &str) -> Option<ArchiveKind> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else if lower.ends_with(".tar.bz2") || lower.ends_with(".tbz2") {
            Some(ArchiveKind::TarBz2)
        } else if lower.ends_with(".tar") {
            Some(ArchiveKind::Tar)
        } else if lower.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else if lower.ends_with(".7z") {
            Some(ArchiveKind::SevenZip)
        } else if lower.ends_with(".rar") {
            Some(ArchiveKind::Rar)
        } else {
            None
        }
    }

    /// Recognize an archive from a path's final component.
    pub fn detect_path(path: &Path) -> Option<ArchiveKind> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(ArchiveKind::detect)
    }

    /// Canonical extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveKind::Zip => "zip",
            ArchiveKind::TarGz => "tar.gz",
            ArchiveKind::TarBz2 => "tar.bz2",
            ArchiveKind::Tar => "tar",
            ArchiveKind::SevenZip => "7z",
            ArchiveKind::Rar => "rar",
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Derive the local file name for a download from its URL.
///
/// Uses the last non-empty segment of the URL path, so query strings and
/// fragments never leak into file names. Percent-encoded characters are
/// decoded; anything that is still unsafe in a file name becomes `_`.
pub fn file_name_from_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw)?;
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .ok_or_else(|| Error::Download {
            url: raw.to_string(),
            message: "URL has no file name in its path".to_string(),
        })?;

    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    let name = sanitize_file_name(&decoded);
    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::Download {
            url: raw.to_string(),
            message: format!("cannot derive a file name from '{}'", segment),
        });
    }
    Ok(name)
}

/// Replace characters that are problematic on common filesystems.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
