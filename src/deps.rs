//! Dependency checks behind `check-deps`.
//!
//! Required programs and Python modules must all be present before a build
//! starts. The 7-Zip and RAR extractors are optional: only a few upstream
//! archives need them, and a missing one surfaces as an extraction warning.

use std::path::Path;

use log::{debug, warn};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::tools::{self, CONVERTER_MODULES};

/// Whether a build can proceed without this dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Required,
    Optional,
}

/// Outcome of probing one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyCheck {
    pub name: String,
    pub purpose: &'static str,
    pub requirement: Requirement,
    pub present: bool,
}

/// Outcome of probing every dependency.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyReport {
    pub checks: Vec<DependencyCheck>,
}

impl DependencyReport {
    /// Names of missing required dependencies.
    pub fn missing_required(&self) -> Vec<String> {
        self.missing(Requirement::Required)
    }

    /// Names of missing optional dependencies.
    pub fn missing_optional(&self) -> Vec<String> {
        self.missing(Requirement::Optional)
    }

    /// `Err(MissingDependencies)` when any required dependency is absent.
    pub fn into_result(self) -> Result<()> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingDependencies { missing })
        }
    }

    fn missing(&self, requirement: Requirement) -> Vec<String> {
        self.checks
            .iter()
            .filter(|check| check.requirement == requirement && !check.present)
            .map(|check| check.name.clone())
            .collect()
    }
}

/// External programs: name, probe arguments, purpose, requirement.
const PROGRAMS: &[(&str, &[&str], &str, Requirement)] = &[
    ("curl", &["--version"], "downloads", Requirement::Required),
    ("tar", &["--version"], "tar archives", Requirement::Required),
    ("unzip", &["-v"], "zip archives", Requirement::Required),
    ("git", &["--version"], "release tags", Requirement::Required),
    ("7z", &["i"], "7z archives", Requirement::Optional),
    ("unrar", &[], "rar archives", Requirement::Optional),
];

/// Probe every dependency with the real system tools.
pub fn check_dependencies(python: &Path) -> DependencyReport {
    check_with(
        python,
        |program, args| tools::program_available(Path::new(program), args),
        tools::python_module_available,
    )
}

/// Probe every dependency with the given probes.
pub fn check_with<P, M>(python: &Path, program_probe: P, module_probe: M) -> DependencyReport
where
    P: Fn(&str, &[&str]) -> bool,
    M: Fn(&Path, &str) -> bool,
{
    let mut report = DependencyReport::default();

    for &(name, args, purpose, requirement) in PROGRAMS {
        let present = program_probe(name, args);
        debug!("{}: {}", name, if present { "found" } else { "missing" });
        if !present && requirement == Requirement::Optional {
            warn!("Optional tool '{}' not found; {} cannot be extracted", name, purpose);
        }
        report.checks.push(DependencyCheck {
            name: name.to_string(),
            purpose,
            requirement,
            present,
        });
    }

    let python_name = python.display().to_string();
    let python_present = program_probe(python_name.as_str(), &["--version"][..]);
    report.checks.push(DependencyCheck {
        name: python_name.clone(),
        purpose: "font conversion",
        requirement: Requirement::Required,
        present: python_present,
    });

    for &module in CONVERTER_MODULES {
        report.checks.push(DependencyCheck {
            name: format!("{} (python module)", module),
            purpose: "font conversion",
            requirement: Requirement::Required,
            present: python_present && module_probe(python, module),
        });
    }

    report
}
