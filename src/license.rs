//! # License Normalizer
//!
//! Every output directory ends up with at most one canonical `LICENSE`
//! file. The staging tree is searched for license files in a fixed priority
//! order, and the first hit of the highest-priority pattern is copied
//! verbatim. Families listed with a [`LicenseTemplate`] instead get the SIL
//! Open Font License template filled in with their metadata.
//!
//! Auxiliary documentation (readme, manifest, fontlog) is copied alongside,
//! and stray noise files are removed from the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use log::{debug, info};
use regex::Regex;
use walkdir::WalkDir;

use crate::catalog::LicenseTemplate;
use crate::error::Result;
use crate::operations::Downloader;

/// File name of the canonical license in every output directory.
pub const CANONICAL_LICENSE: &str = "LICENSE";

/// License file patterns, highest priority first.
pub const LICENSE_PATTERNS: &[&str] = &["LICENSE*", "COPYING*", "OFL.*", "GUST-FONT-LICENSE*"];

/// How deep below the staging root license files are looked for.
pub const LICENSE_SEARCH_DEPTH: usize = 3;

/// Auxiliary documents copied next to the fonts (matched case-insensitively).
pub const DOC_PATTERNS: &[&str] = &["*readme*", "*manifest*", "*fontlog*"];

/// Location of the plain-text Open Font License template.
pub const OFL_TEMPLATE_URL: &str = "https://openfontlicense.org/documents/OFL.txt";

/// Name under which the template is fetched into the output directory.
pub const OFL_TEMPLATE_FILE: &str = "OFL.txt";

/// Template lines describing optional extra holders; dropped before filling.
const ADDITIONAL_MARKERS: &[&str] = &["additional Copyright Holder", "additional Reserved Font Name"];

/// What the normalizer did for one family.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LicenseOutcome {
    /// Staging file copied as the canonical license, if any matched.
    pub copied_from: Option<PathBuf>,
    /// Whether the canonical license was generated from the OFL template.
    pub templated: bool,
    /// Auxiliary documents copied into the output directory.
    pub docs: Vec<String>,
    /// Noise files removed from the output directory.
    pub removed: Vec<String>,
}

/// Normalize licensing for one family.
pub fn normalize(
    family: &str,
    staging_dir: &Path,
    output_dir: &Path,
    template: Option<&LicenseTemplate>,
    downloader: &dyn Downloader,
) -> Result<LicenseOutcome> {
    fs::create_dir_all(output_dir)?;
    let mut outcome = LicenseOutcome::default();

    match find_license(staging_dir)? {
        Some(source) => {
            fs::copy(&source, output_dir.join(CANONICAL_LICENSE))?;
            debug!("[{}] License taken from {}", family, source.display());
            outcome.copied_from = Some(source);
        }
        // Known gap: some upstreams ship no license file we recognize
        None => debug!("[{}] No license file found in staging", family),
    }

    outcome.docs = copy_docs(staging_dir, output_dir)?;
    outcome.removed = remove_noise(output_dir)?;

    if let Some(template) = template {
        apply_template(output_dir, template, downloader)?;
        outcome.templated = true;
        info!("[{}] License generated from the OFL template", family);
    }

    Ok(outcome)
}

/// Find the highest-priority license file in `staging_dir`.
///
/// Patterns are tried in [`LICENSE_PATTERNS`] order; within a pattern the
/// first match in sorted traversal order wins.
pub fn find_license(staging_dir: &Path) -> Result<Option<PathBuf>> {
    if !staging_dir.is_dir() {
        return Ok(None);
    }
    let files = files_under(staging_dir, Some(LICENSE_SEARCH_DEPTH))?;
    for pattern in LICENSE_PATTERNS {
        let pattern = Pattern::new(pattern)?;
        if let Some(found) = files
            .iter()
            .find(|path| file_name_matches(&pattern, path, MatchOptions::new()))
        {
            return Ok(Some(found.clone()));
        }
    }
    Ok(None)
}

/// Copy readme/manifest/fontlog files from anywhere in `staging_dir` into
/// `output_dir`, returning the copied file names.
pub fn copy_docs(staging_dir: &Path, output_dir: &Path) -> Result<Vec<String>> {
    if !staging_dir.is_dir() {
        return Ok(Vec::new());
    }
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    let patterns = DOC_PATTERNS
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut copied = Vec::new();
    for path in files_under(staging_dir, None)? {
        if patterns
            .iter()
            .any(|pattern| file_name_matches(pattern, &path, options))
        {
            if let Some(name) = path.file_name() {
                fs::copy(&path, output_dir.join(name))?;
                copied.push(name.to_string_lossy().into_owned());
            }
        }
    }
    Ok(copied)
}

/// Remove `._*` resource-fork artifacts and FAQ documents from `output_dir`.
pub fn remove_noise(output_dir: &Path) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && (name.starts_with("._") || name.contains("FAQ")) {
            fs::remove_file(entry.path())?;
            removed.push(name);
        }
    }
    removed.sort();
    Ok(removed)
}

/// Write the canonical license from the OFL template.
///
/// The template is fetched into `output_dir` unless already present, filled,
/// written as [`CANONICAL_LICENSE`] and then removed.
pub fn apply_template(
    output_dir: &Path,
    template: &LicenseTemplate,
    downloader: &dyn Downloader,
) -> Result<()> {
    let template_path = output_dir.join(OFL_TEMPLATE_FILE);
    if !template_path.is_file() {
        downloader.download(OFL_TEMPLATE_URL, &template_path)?;
    }
    let text = fs::read_to_string(&template_path)?;
    fs::write(
        output_dir.join(CANONICAL_LICENSE),
        fill_template(&text, template)?,
    )?;
    fs::remove_file(&template_path)?;
    Ok(())
}

/// Fill the OFL template text with a family's metadata.
pub fn fill_template(text: &str, template: &LicenseTemplate) -> Result<String> {
    let contact = Regex::new(r"\s*\(<URL\|email>\)")?;

    let mut filled = String::with_capacity(text.len());
    for line in text.lines() {
        if ADDITIONAL_MARKERS.iter().any(|marker| line.contains(marker)) {
            continue;
        }
        let line = contact.replace_all(line, "");
        let line = line
            .replace("<dates>", template.dates)
            .replace("<Copyright Holder>", template.holder)
            .replace("<Reserved Font Name>", template.reserved_font_name);
        filled.push_str(&line);
        filled.push('\n');
    }
    Ok(filled)
}

fn files_under(root: &Path, max_depth: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(root).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }
    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn file_name_matches(pattern: &Pattern, path: &Path, options: MatchOptions) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| pattern.matches_with(name, options))
}
