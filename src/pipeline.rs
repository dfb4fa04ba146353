//! # Family Pipeline
//!
//! One family's build, end to end:
//!
//! ```text
//! Pending -> Fetching -> Fetched -> Collecting -> Licensing -> Compressing -> Done
//!                 \___________\______________\_____________\____________\--> Failed
//! ```
//!
//! `Fetching` is skipped when a fresh download stamp exists. The staging
//! directory is removed when the pipeline ends, whatever the outcome, so it
//! never survives into a later run. Failures are captured in the returned
//! [`FamilyReport`] rather than propagated, leaving the caller free to carry
//! on with other families.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, error, warn};
use serde::Serialize;

use crate::catalog::FamilySpec;
use crate::collect::collect;
use crate::compress::compress;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::fetch::fetch;
use crate::license::normalize;
use crate::operations::Toolchain;
use crate::stamp::StampStore;

/// Where a family's pipeline currently is, or where it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyState {
    Pending,
    Fetching,
    Fetched,
    Collecting,
    Licensing,
    Compressing,
    Done,
    Failed,
}

impl FamilyState {
    pub fn is_terminal(self) -> bool {
        matches!(self, FamilyState::Done | FamilyState::Failed)
    }
}

impl fmt::Display for FamilyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FamilyState::Pending => "pending",
            FamilyState::Fetching => "fetching",
            FamilyState::Fetched => "fetched",
            FamilyState::Collecting => "collecting",
            FamilyState::Licensing => "licensing",
            FamilyState::Compressing => "compressing",
            FamilyState::Done => "done",
            FamilyState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of one family's pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyReport {
    pub name: String,
    pub state: FamilyState,
    /// The state the pipeline was in when it failed.
    pub failed_in: Option<FamilyState>,
    /// Whether the fetch was skipped thanks to a fresh stamp.
    pub fetch_skipped: bool,
    /// Number of font files copied out of staging.
    pub fonts_collected: usize,
    /// Number of original fonts handed to the converter.
    pub fonts_converted: usize,
    pub error: Option<String>,
}

impl FamilyReport {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: FamilyState::Pending,
            failed_in: None,
            fetch_skipped: false,
            fonts_collected: 0,
            fonts_converted: 0,
            error: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.state == FamilyState::Done
    }

    fn advance(&mut self, next: FamilyState) {
        debug!("[{}] {} -> {}", self.name, self.state, next);
        self.state = next;
    }
}

/// Run the full pipeline for `family`.
pub fn run_family(
    family: &FamilySpec,
    config: &BuildConfig,
    toolchain: &Toolchain,
    stamps: &StampStore,
) -> FamilyReport {
    let mut report = FamilyReport::new(family.name);
    let staging_dir = config.staging_dir(family.name);

    let result = run_steps(family, config, toolchain, stamps, &mut report);

    if let Err(e) = remove_staging(&staging_dir) {
        warn!(
            "[{}] Could not remove staging directory {}: {}",
            family.name,
            staging_dir.display(),
            e
        );
    }

    match result {
        Ok(()) => report.advance(FamilyState::Done),
        Err(e) => {
            error!("[{}] Failed while {}: {}", family.name, report.state, e);
            report.failed_in = Some(report.state);
            report.error = Some(e.to_string());
            report.advance(FamilyState::Failed);
        }
    }
    report
}

fn run_steps(
    family: &FamilySpec,
    config: &BuildConfig,
    toolchain: &Toolchain,
    stamps: &StampStore,
    report: &mut FamilyReport,
) -> Result<()> {
    family.validate()?;
    let staging_dir = config.staging_dir(family.name);
    let output_dir = config.output_dir(family.name);

    if stamps.is_fresh(family.name, family.urls)? {
        debug!("[{}] Download stamp is fresh, skipping fetch", family.name);
        report.fetch_skipped = true;
    } else {
        report.advance(FamilyState::Fetching);
        // Leftovers from an interrupted run must not leak into this one
        remove_staging(&staging_dir)?;
        let outcome = fetch(
            family.name,
            family.urls,
            &staging_dir,
            toolchain.downloader.as_ref(),
            toolchain.extractor.as_ref(),
        )?;
        if outcome.is_complete() {
            stamps.mark(family.name, family.urls)?;
        } else {
            warn!(
                "[{}] {} archive(s) failed to unpack, not stamping; the next build fetches again",
                family.name,
                outcome.failed.len()
            );
        }
    }
    report.advance(FamilyState::Fetched);

    report.advance(FamilyState::Collecting);
    report.fonts_collected = collect(family.name, &staging_dir, &output_dir)?;

    report.advance(FamilyState::Licensing);
    normalize(
        family.name,
        &staging_dir,
        &output_dir,
        family.license_template.as_ref(),
        toolchain.downloader.as_ref(),
    )?;

    report.advance(FamilyState::Compressing);
    report.fonts_converted = compress(family.name, &output_dir, toolchain.converter.as_ref())?;

    Ok(())
}

fn remove_staging(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
