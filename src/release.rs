//! # Release Packager
//!
//! Turns the aggregate output directory into a versioned release:
//!
//! 1. Resolve the version (explicit, or the latest tag with its patch
//!    component bumped, or `1.0.0` for a first release).
//! 2. Build every family, or in dry-run mode stage a synthetic single-family
//!    tree instead.
//! 3. Archive the tree as `mathfonts-<version>.zip` and
//!    `mathfonts-<version>.tar.gz` in the staging root, every entry under a
//!    `mathfonts-<version>/` folder.
//! 4. Write Markdown release notes next to the archives.
//! 5. In real mode only, tag the revision and remove the output directory.
//!
//! Dry runs go through the same archiving and reporting code as real runs;
//! they never tag and never touch the real output directory.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use log::{info, warn};
use semver::Version;
use serde::Serialize;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::{BuildConfig, BUNDLE_PREFIX};
use crate::error::{Error, Result};
use crate::git::parse_semver_tag;
use crate::operations::VersionControl;

/// Family directory staged by dry runs.
pub const PLACEHOLDER_FAMILY: &str = "Placeholder";

/// Font file staged by dry runs.
pub const PLACEHOLDER_FONT: &str = "Placeholder-Math.woff2";

/// Version used when the repository has no usable release tag.
pub const INITIAL_VERSION: Version = Version::new(1, 0, 0);

/// A resolved release version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseVersion {
    pub version: Version,
    /// The tag this version was derived from, if any.
    pub previous_tag: Option<String>,
}

impl ReleaseVersion {
    /// `v`-prefixed form used for tags.
    pub fn tag(&self) -> String {
        format!("v{}", self.version)
    }

    /// Bare numeric form used in file names.
    pub fn bare(&self) -> String {
        self.version.to_string()
    }
}

/// Parse an explicit `MAJOR.MINOR.PATCH` version, with or without a `v`.
pub fn parse_version(raw: &str) -> Result<Version> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let invalid = |message: &str| Error::Version {
        version: raw.to_string(),
        message: message.to_string(),
    };

    let version = Version::parse(bare).map_err(|e| invalid(&e.to_string()))?;
    if !version.pre.is_empty() || !version.build.is_empty() {
        return Err(invalid("expected MAJOR.MINOR.PATCH"));
    }
    Ok(version)
}

/// Decide the release version.
///
/// An explicit version wins. Otherwise the latest tag's patch component is
/// incremented; a missing or unparsable tag yields [`INITIAL_VERSION`].
pub fn resolve_version(
    explicit: Option<&str>,
    vcs: &dyn VersionControl,
) -> Result<ReleaseVersion> {
    if let Some(raw) = explicit {
        return Ok(ReleaseVersion {
            version: parse_version(raw)?,
            previous_tag: None,
        });
    }

    let previous_tag = vcs.latest_tag()?;
    let version = match previous_tag.as_deref() {
        None => INITIAL_VERSION,
        Some(tag) => match parse_semver_tag(tag) {
            Some(prev) if prev.pre.is_empty() => Version::new(prev.major, prev.minor, prev.patch + 1),
            _ => {
                warn!(
                    "Latest tag '{}' is not a MAJOR.MINOR.PATCH version, starting at {}",
                    tag, INITIAL_VERSION
                );
                INITIAL_VERSION
            }
        },
    };
    Ok(ReleaseVersion {
        version,
        previous_tag,
    })
}

/// What to release.
#[derive(Debug, Clone, Default)]
pub struct ReleaseRequest {
    /// Explicit version; auto-incremented from the latest tag when `None`.
    pub version: Option<String>,
    pub dry_run: bool,
}

/// Per-family statistics over the archived tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyStats {
    pub name: String,
    pub woff2_count: usize,
    pub woff2_bytes: u64,
}

/// Aggregate statistics over the archived tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReleaseStats {
    pub families: Vec<FamilyStats>,
    /// `woff2` files anywhere in the tree.
    pub woff2_count: usize,
    pub woff2_bytes: u64,
    /// `<family>/<file>` for every woff2 whose name mentions "math".
    pub math_fonts: Vec<String>,
}

/// Everything a release produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseOutcome {
    pub version: ReleaseVersion,
    pub dry_run: bool,
    pub zip_path: PathBuf,
    pub zip_size: u64,
    pub tar_path: PathBuf,
    pub tar_size: u64,
    pub notes_path: PathBuf,
    pub stats: ReleaseStats,
    pub tagged: bool,
}

impl ReleaseOutcome {
    /// Manual steps left after a real release, or what a real run would
    /// have done after a dry run.
    pub fn follow_up(&self) -> Vec<String> {
        let tag = self.version.tag();
        if self.dry_run {
            return vec![
                "Would build every family and archive the output directory".to_string(),
                format!("Would create annotated tag {}", tag),
                "Would remove the output directory after archiving".to_string(),
            ];
        }
        vec![
            format!("git push origin {}", tag),
            format!(
                "Create a release for {} and attach {} and {}",
                tag,
                self.zip_path.display(),
                self.tar_path.display()
            ),
            format!("Use {} as the release description", self.notes_path.display()),
        ]
    }
}

/// Builds release bundles from the output directory.
pub struct Packager<'a> {
    config: &'a BuildConfig,
    vcs: &'a dyn VersionControl,
}

impl<'a> Packager<'a> {
    pub fn new(config: &'a BuildConfig, vcs: &'a dyn VersionControl) -> Self {
        Self { config, vcs }
    }

    /// Run a release. `build` produces the real output directory and is only
    /// called outside dry-run mode.
    pub fn run<B>(&self, request: &ReleaseRequest, build: B) -> Result<ReleaseOutcome>
    where
        B: FnOnce() -> Result<()>,
    {
        let version = self.resolve(request)?;
        info!(
            "Preparing release {}{}",
            version.tag(),
            if request.dry_run { " (dry run)" } else { "" }
        );

        let source = if request.dry_run {
            stage_placeholder(&self.config.dry_run_dist_dir())?
        } else {
            build()?;
            self.config.dist_dir.clone()
        };

        if !source.is_dir() {
            return Err(Error::Release {
                message: format!(
                    "output directory {} does not exist after build",
                    source.display()
                ),
            });
        }

        let result = self.package(&version, &source, request.dry_run);
        if request.dry_run {
            remove_dir_if_present(&source)?;
        }
        let mut outcome = result?;

        if !request.dry_run {
            self.vcs
                .create_tag(&outcome.version.tag(), &format!("Release {}", outcome.version.tag()))?;
            outcome.tagged = true;
            info!("Created tag {}", outcome.version.tag());
            remove_dir_if_present(&source)?;
            info!("Removed {}", source.display());
        }

        Ok(outcome)
    }

    /// A dry run outside a usable repository starts from [`INITIAL_VERSION`].
    fn resolve(&self, request: &ReleaseRequest) -> Result<ReleaseVersion> {
        match resolve_version(request.version.as_deref(), self.vcs) {
            Err(e @ Error::GitCommand { .. }) if request.dry_run => {
                warn!(
                    "Could not read the latest tag ({}), dry run uses {}",
                    e, INITIAL_VERSION
                );
                Ok(ReleaseVersion {
                    version: INITIAL_VERSION,
                    previous_tag: None,
                })
            }
            other => other,
        }
    }

    fn package(&self, version: &ReleaseVersion, source: &Path, dry_run: bool) -> Result<ReleaseOutcome> {
        fs::create_dir_all(&self.config.tmp_dir)?;
        let bare = version.bare();
        let prefix = format!("{}-{}", BUNDLE_PREFIX, bare);

        let stats = collect_stats(source)?;

        let zip_path = self.config.bundle_path(&bare, "zip");
        write_zip(source, &zip_path, &prefix)?;
        let zip_size = fs::metadata(&zip_path)?.len();
        info!("Created {} ({})", zip_path.display(), format_size(zip_size));

        let tar_path = self.config.bundle_path(&bare, "tar.gz");
        write_tar_gz(source, &tar_path, &prefix)?;
        let tar_size = fs::metadata(&tar_path)?.len();
        info!("Created {} ({})", tar_path.display(), format_size(tar_size));

        info!("Archived {} woff2 font(s)", stats.woff2_count);

        let notes_path = self
            .config
            .tmp_dir
            .join(format!("{}-notes.md", prefix));
        fs::write(&notes_path, render_notes(version, &stats))?;

        Ok(ReleaseOutcome {
            version: version.clone(),
            dry_run,
            zip_path,
            zip_size,
            tar_path,
            tar_size,
            notes_path,
            stats,
            tagged: false,
        })
    }
}

/// Create the synthetic single-family tree used by dry runs and return its
/// root.
pub fn stage_placeholder(root: &Path) -> Result<PathBuf> {
    remove_dir_if_present(root)?;
    let family_dir = root.join(PLACEHOLDER_FAMILY);
    fs::create_dir_all(&family_dir)?;
    fs::write(family_dir.join(PLACEHOLDER_FONT), b"wOF2 placeholder\n")?;
    fs::write(
        family_dir.join(crate::license::CANONICAL_LICENSE),
        "Placeholder license for dry-run releases.\n",
    )?;
    Ok(root.to_path_buf())
}

/// Gather woff2 statistics from an output tree.
pub fn collect_stats(source: &Path) -> Result<ReleaseStats> {
    let mut stats = ReleaseStats::default();

    let mut family_dirs: Vec<PathBuf> = fs::read_dir(source)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    family_dirs.sort();

    for dir in family_dirs {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut family = FamilyStats {
            name: name.clone(),
            woff2_count: 0,
            woff2_bytes: 0,
        };
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_woff2(entry.path()) {
                continue;
            }
            family.woff2_count += 1;
            family.woff2_bytes += entry.metadata()?.len();
            let file_name = entry.file_name().to_string_lossy();
            if file_name.to_lowercase().contains("math") {
                stats.math_fonts.push(format!("{}/{}", name, file_name));
            }
        }
        stats.woff2_count += family.woff2_count;
        stats.woff2_bytes += family.woff2_bytes;
        stats.families.push(family);
    }

    // Loose files at the top level still count towards the total
    for entry in fs::read_dir(source)? {
        let path = entry?.path();
        if path.is_file() && is_woff2(&path) {
            stats.woff2_count += 1;
            stats.woff2_bytes += fs::metadata(&path)?.len();
        }
    }

    Ok(stats)
}

/// Markdown release notes.
pub fn render_notes(version: &ReleaseVersion, stats: &ReleaseStats) -> String {
    let mut notes = String::new();
    let _ = writeln!(notes, "# MathFonts Release {}\n", version.tag());
    let _ = writeln!(notes, "## Overview");
    let _ = writeln!(
        notes,
        "This release contains {} optimized WOFF2 fonts from {} font families, totaling {:.1} MB.\n",
        stats.woff2_count,
        stats.families.len(),
        megabytes(stats.woff2_bytes)
    );
    if let Some(previous) = &version.previous_tag {
        let _ = writeln!(notes, "Previous release: {}\n", previous);
    }

    let _ = writeln!(notes, "## Font Families");
    for family in &stats.families {
        let _ = writeln!(
            notes,
            "- **{}**: {} fonts ({:.1} MB)",
            family.name,
            family.woff2_count,
            megabytes(family.woff2_bytes)
        );
    }

    let _ = writeln!(notes, "\n## Math Fonts");
    for font in &stats.math_fonts {
        let _ = writeln!(notes, "- {}", font);
    }

    let _ = writeln!(notes, "\n## Installation");
    let _ = writeln!(notes, "1. Download the ZIP or TAR.GZ archive");
    let _ = writeln!(notes, "2. Extract it to your desired location");
    let _ = writeln!(notes, "3. Reference the fonts from your CSS or LaTeX documents");
    notes
}

fn write_zip(source: &Path, dest: &Path, prefix: &str) -> Result<()> {
    let mut zip = ZipWriter::new(File::create(dest)?);
    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let dir_options = SimpleFileOptions::default().unix_permissions(0o755);

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let name = archive_name(prefix, source, entry.path());
        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), dir_options)?;
        } else if entry.file_type().is_file() {
            zip.start_file(name, file_options)?;
            io::copy(&mut File::open(entry.path())?, &mut zip)?;
        }
    }
    zip.finish()?;
    Ok(())
}

fn write_tar_gz(source: &Path, dest: &Path, prefix: &str) -> Result<()> {
    let encoder = GzEncoder::new(File::create(dest)?, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(true);

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let name = archive_name(prefix, source, entry.path());
        if entry.file_type().is_dir() {
            builder.append_dir(&name, entry.path())?;
        } else if entry.file_type().is_file() {
            builder.append_path_with_name(entry.path(), &name)?;
        }
    }
    builder.into_inner()?.finish()?;
    Ok(())
}

/// `prefix/relative/path` with forward slashes.
fn archive_name(prefix: &str, source: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(source).unwrap_or(path);
    let mut name = prefix.to_string();
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}

fn is_woff2(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("woff2"))
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Size with a binary unit suffix, e.g. `1.5 MiB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn remove_dir_if_present(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
