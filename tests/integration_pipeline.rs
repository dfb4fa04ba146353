//! Integration tests for building families through the orchestrator with
//! in-memory capabilities.

mod common;

use std::fs;

use common::fakes::{manifest, toolchain, FakeConverter, FakeDownloader, FakeExtractor};
use mathfonts::archive::ArchiveKind;
use mathfonts::catalog::{FamilySpec, LicenseTemplate};
use mathfonts::config::BuildConfig;
use mathfonts::license::OFL_TEMPLATE_URL;
use mathfonts::orchestrator::{clean, BuildOrchestrator};
use mathfonts::pipeline::FamilyState;
use mathfonts::stamp::StampStore;
use walkdir::WalkDir;

const ALPHA_ZIP: &str = "https://fonts.example.org/alpha/Alpha-2.0.zip";
const ALPHA_OTF: &str = "https://fonts.example.org/alpha/raw/Alpha-Math.otf";
const BETA_TGZ: &str = "https://fonts.example.org/beta/beta-1.1.tar.gz?ref=release";
const BROKEN_URL: &str = "https://mirror.invalid/gamma/gamma.zip";

const ALPHA: FamilySpec = FamilySpec {
    name: "Alpha",
    urls: &[ALPHA_ZIP, ALPHA_OTF],
    license_template: None,
};

const BETA: FamilySpec = FamilySpec {
    name: "Beta",
    urls: &[BETA_TGZ],
    license_template: Some(LicenseTemplate {
        dates: "2024",
        holder: "X",
        reserved_font_name: "Y",
    }),
};

const GAMMA: FamilySpec = FamilySpec {
    name: "Gamma",
    urls: &[BROKEN_URL],
    license_template: None,
};

const OFL_TEMPLATE: &str = "\
Copyright (c) <dates>, <Copyright Holder> (<URL|email>),
with Reserved Font Name <Reserved Font Name>.
Copyright (c) <dates>, <additional Copyright Holder> (<URL|email>),
with Reserved Font Name <additional Reserved Font Name>.

This Font Software is licensed under the SIL Open Font License, Version 1.1.
";

fn downloader() -> FakeDownloader {
    FakeDownloader::new()
        .serve(
            ALPHA_ZIP,
            manifest(&[
                ("Alpha-2.0/OTF/Alpha-Regular.otf", "alpha regular"),
                ("Alpha-2.0/OTF/Alpha-Bold.otf", "alpha bold"),
                ("Alpha-2.0/COPYING", "copying"),
                ("Alpha-2.0/LICENSE.txt", "alpha license"),
                ("Alpha-2.0/doc/FONTLOG.txt", "fontlog"),
                ("Alpha-2.0/OFL-FAQ.txt", "faq"),
            ]),
        )
        .serve(ALPHA_OTF, "alpha math")
        .serve(
            BETA_TGZ,
            manifest(&[
                ("beta/Beta-Math.ttf", "beta math"),
                ("beta/OFL.txt", "stale upstream license"),
            ]),
        )
        .serve(OFL_TEMPLATE_URL, OFL_TEMPLATE)
}

#[test]
fn test_one_family_failure_does_not_block_others() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = BuildConfig::new(temp.path()).with_jobs(3);
    let downloader = downloader();
    let converter = FakeConverter::new();
    let orchestrator = BuildOrchestrator::new(
        config.clone(),
        toolchain(&downloader, &FakeExtractor::new(), &converter),
    );

    let summary = orchestrator
        .build(&[&ALPHA, &GAMMA, &BETA], |_| {})
        .unwrap();

    assert_eq!(summary.built_count(), 2);
    let failed = summary.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "Gamma");
    assert_eq!(failed[0].failed_in, Some(FamilyState::Fetching));

    let alpha = config.output_dir("Alpha");
    for name in [
        "Alpha-Regular.otf",
        "Alpha-Bold.otf",
        "Alpha-Math.otf",
        "Alpha-Math.woff2",
        "Alpha-Regular.woff",
        "FONTLOG.txt",
    ] {
        assert!(alpha.join(name).is_file(), "Alpha/{} missing", name);
    }
    assert_eq!(
        fs::read_to_string(alpha.join("LICENSE")).unwrap(),
        "alpha license"
    );
    assert!(!alpha.join("OFL-FAQ.txt").exists());
    assert!(!alpha.join("COPYING").exists());

    let beta_license = fs::read_to_string(config.output_dir("Beta").join("LICENSE")).unwrap();
    assert!(beta_license.starts_with("Copyright (c) 2024, X,\nwith Reserved Font Name Y."));
    assert!(!beta_license.contains('<'));
    assert!(!config.output_dir("Beta").join("OFL.txt").exists());

    // Staging never survives a pipeline, failed or not
    for family in ["Alpha", "Beta", "Gamma"] {
        assert!(!config.staging_dir(family).exists(), "{} staging left", family);
    }

    let table = summary.render();
    assert!(table.contains("2/3 families built"));
    assert!(table.contains("Gamma: Download failed"));
}

#[test]
fn test_rebuild_with_fresh_stamps_skips_network() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = BuildConfig::new(temp.path()).with_jobs(2);
    let downloader = downloader();
    let orchestrator = BuildOrchestrator::new(
        config.clone(),
        toolchain(&downloader, &FakeExtractor::new(), &FakeConverter::new()),
    );

    orchestrator.build(&[&ALPHA], |_| {}).unwrap();
    let first_run = downloader.call_count();
    assert_eq!(first_run, 2);

    let summary = orchestrator.build(&[&ALPHA], |_| {}).unwrap();

    assert!(summary.all_succeeded());
    assert!(summary.rows[0].report.fetch_skipped);
    assert_eq!(downloader.call_count(), first_run);
    assert!(config.output_dir("Alpha").join("Alpha-Math.woff2").is_file());
}

#[test]
fn test_clean_forces_refetch() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = BuildConfig::new(temp.path());
    let downloader = downloader();
    let orchestrator = BuildOrchestrator::new(
        config.clone(),
        toolchain(&downloader, &FakeExtractor::new(), &FakeConverter::new()),
    );

    orchestrator.build(&[&ALPHA], |_| {}).unwrap();
    clean(&config).unwrap();
    assert!(!StampStore::new(&config.tmp_dir).is_fresh("Alpha", ALPHA.urls).unwrap());

    let summary = orchestrator.build(&[&ALPHA], |_| {}).unwrap();

    assert!(!summary.rows[0].report.fetch_skipped);
    assert_eq!(downloader.calls_for(ALPHA_ZIP), 2);
}

#[test]
fn test_changed_sources_invalidate_stamp() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = BuildConfig::new(temp.path());
    let downloader = downloader();
    let orchestrator = BuildOrchestrator::new(
        config.clone(),
        toolchain(&downloader, &FakeExtractor::new(), &FakeConverter::new()),
    );
    let zip_only = FamilySpec {
        urls: &[ALPHA_ZIP],
        ..ALPHA
    };

    orchestrator.build(&[&zip_only], |_| {}).unwrap();
    let summary = orchestrator.build(&[&ALPHA], |_| {}).unwrap();

    assert!(!summary.rows[0].report.fetch_skipped);
    assert_eq!(downloader.calls_for(ALPHA_ZIP), 2);
    assert_eq!(downloader.calls_for(ALPHA_OTF), 1);
}

#[test]
fn test_family_without_sources_still_completes() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = BuildConfig::new(temp.path());
    let converter = FakeConverter::new();
    let orchestrator = BuildOrchestrator::new(
        config.clone(),
        toolchain(&FakeDownloader::new(), &FakeExtractor::new(), &converter),
    );
    let empty = FamilySpec {
        name: "Empty",
        urls: &[],
        license_template: None,
    };

    let summary = orchestrator.build(&[&empty], |_| {}).unwrap();

    assert!(summary.all_succeeded());
    assert_eq!(summary.rows[0].report.fonts_collected, 0);
    assert!(converter.calls.lock().unwrap().is_empty());
    assert_eq!(summary.rows[0].sizes, [None; 4]);
}

#[test]
fn test_corrupt_archive_is_kept_out_of_output() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = BuildConfig::new(temp.path());
    let downloader = downloader();
    let extractor = FakeExtractor::new().broken("Alpha-2.0.zip");
    let orchestrator = BuildOrchestrator::new(
        config.clone(),
        toolchain(&downloader, &extractor, &FakeConverter::new()),
    );

    let summary = orchestrator.build(&[&ALPHA], |_| {}).unwrap();

    // The standalone font still builds; the broken archive only warns
    assert!(summary.all_succeeded());
    assert_eq!(summary.rows[0].report.fonts_collected, 1);
    let archives_in_output = WalkDir::new(config.output_dir("Alpha"))
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| ArchiveKind::detect_path(e.path()).is_some())
        .count();
    assert_eq!(archives_in_output, 0);
}

#[test]
fn test_failed_extraction_is_retried_on_next_build() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = BuildConfig::new(temp.path());
    let downloader = downloader();
    let stamps = StampStore::new(&config.tmp_dir);

    let missing_archiver = BuildOrchestrator::new(
        config.clone(),
        toolchain(
            &downloader,
            &FakeExtractor::new().broken("Alpha-2.0.zip"),
            &FakeConverter::new(),
        ),
    );
    missing_archiver.build(&[&ALPHA], |_| {}).unwrap();
    assert!(!stamps.is_fresh("Alpha", ALPHA.urls).unwrap());
    assert!(!config.output_dir("Alpha").join("Alpha-Regular.otf").exists());

    let installed = BuildOrchestrator::new(
        config.clone(),
        toolchain(&downloader, &FakeExtractor::new(), &FakeConverter::new()),
    );
    let summary = installed.build(&[&ALPHA], |_| {}).unwrap();

    assert!(!summary.rows[0].report.fetch_skipped);
    assert_eq!(downloader.calls_for(ALPHA_ZIP), 2);
    assert!(config.output_dir("Alpha").join("Alpha-Regular.otf").is_file());
    assert!(stamps.is_fresh("Alpha", ALPHA.urls).unwrap());
}
