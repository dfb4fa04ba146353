//! Git helpers used by the release packager.
//!
//! These shell out to the system `git` command, which picks up whatever
//! identity, signing and credential configuration the user already has.

use std::path::Path;
use std::process::Command;

use semver::Version;

use crate::error::{Error, Result};

/// Return the highest version-sorted tag, or `None` when the repository has
/// no tags yet. Fails outside a working tree.
pub fn latest_tag(repo_dir: &Path) -> Result<Option<String>> {
    let command = "tag --list --sort=-v:refname";
    let output = Command::new("git")
        .args(["tag", "--list", "--sort=-v:refname"])
        .current_dir(repo_dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: command.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: command.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string))
}

/// Create an annotated tag at `HEAD`.
pub fn create_annotated_tag(repo_dir: &Path, tag: &str, message: &str) -> Result<()> {
    let output = Command::new("git")
        .args(["tag", "-a", tag, "-m", message])
        .current_dir(repo_dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: format!("tag -a {}", tag),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: format!("tag -a {}", tag),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Parse a tag string into a semantic version
pub fn parse_semver_tag(tag: &str) -> Option<Version> {
    // Common tag formats: v1.0.0, 1.0.0
    let version_str = tag.strip_prefix('v').unwrap_or(tag);
    Version::parse(version_str).ok()
}
