//! Fake capability implementations shared by the unit tests.
//!
//! Fake archives are plain text manifests: one `path<TAB>content` line per
//! file. `FakeExtractor` writes those files under the destination directory,
//! which is enough to exercise every filesystem side effect of the pipeline
//! without network access or system archivers.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::archive::ArchiveKind;
use crate::error::{Error, Result};
use crate::operations::{Downloader, Extractor, FontConverter, Toolchain, VersionControl};

/// Build a fake archive manifest from `(path, content)` pairs.
pub fn manifest(files: &[(&str, &str)]) -> String {
    files
        .iter()
        .map(|(path, content)| format!("{}\t{}\n", path, content))
        .collect()
}

/// Serves canned bodies per URL and records every request.
#[derive(Clone, Default)]
pub struct FakeDownloader {
    bodies: HashMap<String, Vec<u8>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.to_string(), body.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Downloader for FakeDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.bodies.get(url) {
            Some(body) => {
                fs::write(dest, body)?;
                Ok(())
            }
            None => Err(Error::Download {
                url: url.to_string(),
                message: "HTTP 404".to_string(),
            }),
        }
    }
}

/// Unpacks manifest archives; archives whose name is listed in `broken`
/// fail to extract.
#[derive(Clone, Default)]
pub struct FakeExtractor {
    broken: HashSet<String>,
    pub calls: Arc<Mutex<Vec<(String, ArchiveKind)>>>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broken(mut self, file_name: &str) -> Self {
        self.broken.insert(file_name.to_string());
        self
    }
}

impl Extractor for FakeExtractor {
    fn extract(&self, archive: &Path, kind: ArchiveKind, dest_dir: &Path) -> Result<()> {
        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.lock().unwrap().push((name.clone(), kind));
        if self.broken.contains(&name) {
            return Err(Error::Extraction {
                archive: name,
                message: "corrupt archive".to_string(),
            });
        }
        let text = fs::read_to_string(archive)?;
        for line in text.lines().filter(|l| !l.is_empty()) {
            let (path, content) = line.split_once('\t').unwrap_or((line, ""));
            let target = dest_dir.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, content)?;
        }
        Ok(())
    }
}

/// Writes `.woff`/`.woff2` siblings and records the font lists it was given.
#[derive(Clone, Default)]
pub struct FakeConverter {
    fail: bool,
    pub calls: Arc<Mutex<Vec<(PathBuf, Vec<String>)>>>,
}

impl FakeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl FontConverter for FakeConverter {
    fn convert(&self, dir: &Path, fonts: &[String]) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((dir.to_path_buf(), fonts.to_vec()));
        if self.fail {
            return Err(Error::Conversion {
                dir: dir.display().to_string(),
                message: "fontTools crashed".to_string(),
            });
        }
        for font in fonts {
            let stem = Path::new(font)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            fs::write(dir.join(format!("{}.woff", stem)), b"woff")?;
            fs::write(dir.join(format!("{}.woff2", stem)), b"woff2")?;
        }
        Ok(())
    }
}

/// In-memory tag list. An unavailable one fails every lookup, like `git`
/// run outside a working tree.
#[derive(Clone, Default)]
pub struct FakeVersionControl {
    unavailable: bool,
    pub tags: Arc<Mutex<Vec<String>>>,
}

impl FakeVersionControl {
    pub fn with_tag(tag: &str) -> Self {
        let vcs = Self::default();
        vcs.tags.lock().unwrap().push(tag.to_string());
        vcs
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }
}

impl VersionControl for FakeVersionControl {
    fn latest_tag(&self) -> Result<Option<String>> {
        if self.unavailable {
            return Err(Error::GitCommand {
                command: "tag --list --sort=-v:refname".to_string(),
                stderr: "fatal: not a git repository".to_string(),
            });
        }
        Ok(self.tags.lock().unwrap().last().cloned())
    }

    fn create_tag(&self, tag: &str, _message: &str) -> Result<()> {
        self.tags.lock().unwrap().push(tag.to_string());
        Ok(())
    }
}

/// Bundle fakes into a toolchain, keeping clones for inspection.
pub fn toolchain(
    downloader: &FakeDownloader,
    extractor: &FakeExtractor,
    converter: &FakeConverter,
) -> Toolchain {
    Toolchain::with_operations(
        Box::new(downloader.clone()),
        Box::new(extractor.clone()),
        Box::new(converter.clone()),
    )
}
