//! # Build Orchestrator
//!
//! Runs the [family pipeline](crate::pipeline) for a batch of families on a
//! bounded rayon pool and aggregates the per-family reports into a
//! [`BuildSummary`].
//!
//! Families share no mutable state: each one owns its staging directory,
//! its stamp and its output directory, so pipelines run without any
//! cross-family locking. A failed family never stops the batch.

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::FamilySpec;
use crate::collect::FONT_EXTENSIONS;
use crate::config::{BuildConfig, STAMP_SUFFIX};
use crate::error::Result;
use crate::operations::Toolchain;
use crate::pipeline::{run_family, FamilyReport};
use crate::stamp::StampStore;

/// Drives family pipelines in parallel.
pub struct BuildOrchestrator {
    config: BuildConfig,
    toolchain: Toolchain,
    stamps: StampStore,
}

impl BuildOrchestrator {
    pub fn new(config: BuildConfig, toolchain: Toolchain) -> Self {
        let stamps = StampStore::new(&config.tmp_dir);
        Self {
            config,
            toolchain,
            stamps,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build `families` with at most `config.jobs` running at once.
    ///
    /// `on_finished` is called from worker threads as each family completes.
    /// Reports come back in the order the families were given.
    pub fn build<F>(&self, families: &[&FamilySpec], on_finished: F) -> Result<BuildSummary>
    where
        F: Fn(&FamilyReport) + Sync,
    {
        let jobs = self.config.jobs.max(1);
        info!(
            "Building {} famil{} with {} worker(s)",
            families.len(),
            if families.len() == 1 { "y" } else { "ies" },
            jobs
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|index| format!("mathfonts-worker-{}", index))
            .build()?;

        let reports: Vec<FamilyReport> = pool.install(|| {
            families
                .par_iter()
                .map(|family| {
                    let report = run_family(family, &self.config, &self.toolchain, &self.stamps);
                    on_finished(&report);
                    report
                })
                .collect()
        });

        let rows = reports
            .into_iter()
            .map(|report| {
                let sizes = format_sizes(&self.config.output_dir(&report.name));
                SummaryRow { report, sizes }
            })
            .collect();
        Ok(BuildSummary { rows })
    }
}

/// One line of the build summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub report: FamilyReport,
    /// Total bytes per entry of [`FONT_EXTENSIONS`]; `None` when no file of
    /// that format exists.
    pub sizes: [Option<u64>; 4],
}

/// Aggregate outcome of a build batch.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub rows: Vec<SummaryRow>,
}

impl BuildSummary {
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn built_count(&self) -> usize {
        self.rows.iter().filter(|row| row.report.succeeded()).count()
    }

    pub fn failed(&self) -> Vec<&FamilyReport> {
        self.rows
            .iter()
            .map(|row| &row.report)
            .filter(|report| !report.succeeded())
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.built_count() == self.total()
    }

    /// Plain-text table of every family followed by the built count and the
    /// failure messages.
    pub fn render(&self) -> String {
        self.render_with(|_, cell| cell)
    }

    /// [`render`](Self::render) with each padded status cell passed through
    /// `style_status(succeeded, cell)`.
    pub fn render_with<F>(&self, style_status: F) -> String
    where
        F: Fn(bool, String) -> String,
    {
        let width = self
            .rows
            .iter()
            .map(|row| row.report.name.len())
            .max()
            .unwrap_or(0)
            .max("Family".len());

        let mut out = String::new();
        let _ = write!(out, "{:<width$}  {:<6}", "Family", "Status", width = width);
        for ext in FONT_EXTENSIONS {
            let _ = write!(out, "  {:>8}", ext);
        }
        out.push('\n');

        for row in &self.rows {
            let succeeded = row.report.succeeded();
            let cell = format!("{:<6}", if succeeded { "built" } else { "FAILED" });
            let _ = write!(
                out,
                "{:<width$}  {}",
                row.report.name,
                style_status(succeeded, cell),
                width = width
            );
            for size in row.sizes {
                let _ = write!(out, "  {:>8}", format_kib(size));
            }
            out.push('\n');
        }

        let _ = writeln!(
            out,
            "\n{}/{} families built",
            self.built_count(),
            self.total()
        );
        for report in self.failed() {
            let _ = writeln!(
                out,
                "  {}: {}",
                report.name,
                report.error.as_deref().unwrap_or("unknown error")
            );
        }
        out
    }
}

/// Human-readable KiB size, or `-` for an absent format.
pub fn format_kib(bytes: Option<u64>) -> String {
    match bytes {
        Some(bytes) => format!("{}K", bytes.div_ceil(1024)),
        None => "-".to_string(),
    }
}

/// Sum the sizes of the font files directly inside `dir`, per format.
pub fn format_sizes(dir: &Path) -> [Option<u64>; 4] {
    let mut sizes = [None; 4];
    let Ok(entries) = fs::read_dir(dir) else {
        return sizes;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let Some(index) = FONT_EXTENSIONS
            .iter()
            .position(|known| ext.eq_ignore_ascii_case(known))
        else {
            continue;
        };
        if let Ok(metadata) = entry.metadata() {
            if metadata.is_file() {
                *sizes[index].get_or_insert(0) += metadata.len();
            }
        }
    }
    sizes
}

/// Remove every staging directory, every download stamp and the output tree.
///
/// Release bundles and notes in the staging root are kept.
pub fn clean(config: &BuildConfig) -> Result<()> {
    if config.tmp_dir.is_dir() {
        for entry in fs::read_dir(&config.tmp_dir)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_dir() {
                debug!("Removing {}", path.display());
                fs::remove_dir_all(&path)?;
            } else if name.ends_with(STAMP_SUFFIX) {
                debug!("Removing {}", path.display());
                fs::remove_file(&path)?;
            }
        }
    }
    remove_tree(&config.dist_dir)?;
    info!("Cleaned staging and output directories");
    Ok(())
}

/// [`clean`], then remove the staging root with its release bundles and notes.
pub fn distclean(config: &BuildConfig) -> Result<()> {
    clean(config)?;
    remove_tree(&config.tmp_dir)?;
    info!("Removed all generated files");
    Ok(())
}

fn remove_tree(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
