//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new();
//!     fixture.command().arg("list").assert().success();
//! }
//! ```
//!
//! Library-level tests use the fake capabilities in [`fakes`], which serve
//! canned archives from memory so no test touches the network or needs the
//! system archivers.

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::fakes;
    pub use super::TestFixture;
}

/// Every environment variable the CLI reads.
pub const ENV_VARS: &[&str] = &[
    "MATHFONTS_ROOT",
    "MATHFONTS_TMP_DIR",
    "MATHFONTS_DIST_DIR",
    "MATHFONTS_PYTHON",
    "MATHFONTS_JOBS",
    "MATHFONTS_TIMEOUT",
    "RUST_LOG",
];

/// A temporary project root.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path (relative to the root) and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A path below the root, for `assert_fs` assertions.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    #[allow(dead_code)]
    pub fn tmp_dir(&self) -> PathBuf {
        self.path().join("tmp")
    }

    #[allow(dead_code)]
    pub fn dist_dir(&self) -> PathBuf {
        self.path().join("dist")
    }

    /// Create a command running in this fixture's directory with every
    /// `MATHFONTS_*` override removed from the environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mathfonts");
        cmd.current_dir(self.path());
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Fake capabilities for driving the library without external tools.
///
/// Same shapes and names as the crate's unit-test fakes: archives are text
/// manifests with one `path<TAB>content` line per file, and every fake
/// records its calls.
#[allow(dead_code)]
pub mod fakes {
    use std::collections::{HashMap, HashSet};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use mathfonts::archive::ArchiveKind;
    use mathfonts::error::{Error, Result};
    use mathfonts::operations::{
        Downloader, Extractor, FontConverter, Toolchain, VersionControl,
    };

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

        pub fn calls_for(&self, url: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|requested| requested.as_str() == url)
                .count()
        }
    }

    impl Downloader for FakeDownloader {
        fn download(&self, url: &str, dest: &Path) -> Result<()> {
            self.calls.lock().unwrap().push(url.to_string());
            let body = self.bodies.get(url).ok_or_else(|| Error::Download {
                url: url.to_string(),
                message: "Could not resolve host".to_string(),
            })?;
            fs::write(dest, body)?;
            Ok(())
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
                    message: "unexpected end of archive".to_string(),
                });
            }
            for line in fs::read_to_string(archive)?.lines() {
                let Some((path, content)) = line.split_once('\t') else {
                    continue;
                };
                let target = dest_dir.join(path);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(target, content)?;
            }
            Ok(())
        }
    }

    /// Writes `.woff`/`.woff2` copies of each font and records the font
    /// lists it was given.
    #[derive(Clone, Default)]
    pub struct FakeConverter {
        pub calls: Arc<Mutex<Vec<(PathBuf, Vec<String>)>>>,
    }

    impl FakeConverter {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl FontConverter for FakeConverter {
        fn convert(&self, dir: &Path, fonts: &[String]) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((dir.to_path_buf(), fonts.to_vec()));
            for font in fonts {
                let source = dir.join(font);
                let stem = source
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                fs::copy(&source, dir.join(format!("{}.woff", stem)))?;
                fs::copy(&source, dir.join(format!("{}.woff2", stem)))?;
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

        pub fn tag_list(&self) -> Vec<String> {
            self.tags.lock().unwrap().clone()
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
}
