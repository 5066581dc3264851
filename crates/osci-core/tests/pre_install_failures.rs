//! Pre-install failures are collected, not raised one at a time.

mod support;

use osci_core::pipeline::{Pipeline, PipelineError, Step};
use osci_core::release::ReleaseClient;
use tempfile::TempDir;

use support::{RecordingRunner, stage_source_archive, temp_plan, unreachable_url};

fn failed_steps(err: &PipelineError) -> Vec<Step> {
    err.failures().iter().map(|f| f.step).collect()
}

#[test]
fn failing_build_still_attempts_package() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let plan = temp_plan(&temp, "1.29.7");
    stage_source_archive(&plan);

    let runner = RecordingRunner::new().failing_on("build");
    let client = ReleaseClient::new().expect("Failed to build client");

    let err = Pipeline::new(plan, &runner, &client)
        .pre_install()
        .expect_err("build failure should surface");

    assert_eq!(failed_steps(&err), vec![Step::Build]);
    assert_eq!(
        runner.commands(),
        vec!["npm install", "npm run build", "npm run package"]
    );
}

#[test]
fn missing_archive_fails_every_step_without_running_commands() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let mut plan = temp_plan(&temp, "1.29.7");
    plan.source_url = unreachable_url();

    let runner = RecordingRunner::new();
    let client = ReleaseClient::new().expect("Failed to build client");

    let err = Pipeline::new(plan, &runner, &client)
        .pre_install()
        .expect_err("download should fail");

    assert_eq!(failed_steps(&err), Step::PRE_INSTALL.to_vec());
    assert!(runner.calls.borrow().is_empty());

    let text = err.to_string();
    assert!(text.contains("5 step(s)"), "{text}");
    assert!(text.contains("Extracted source tree missing"), "{text}");
}

#[test]
fn run_stops_before_install_when_pre_install_fails() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let plan = temp_plan(&temp, "1.29.7");
    stage_source_archive(&plan);

    let layout = plan.layout.clone();
    let runner = RecordingRunner::new()
        .packaging_to(&layout.packaged_bundle)
        .failing_on("install");
    let client = ReleaseClient::new().expect("Failed to build client");

    let err = Pipeline::new(plan, &runner, &client)
        .run(false)
        .expect_err("dependency install failure should stop the run");

    assert!(matches!(err, PipelineError::PreInstall(_)));
    assert_eq!(err.step(), Step::InstallDependencies);
    assert!(!layout.install_dir.exists());
    // Staging is left alone for inspection.
    assert!(layout.archive.exists());
}

#[test]
fn corrupt_archive_fails_extract_and_downstream_steps() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let plan = temp_plan(&temp, "1.29.7");
    std::fs::create_dir_all(&plan.layout.staging_dir).expect("staging dir");
    std::fs::write(&plan.layout.archive, b"not a zip").expect("archive");

    let runner = RecordingRunner::new();
    let client = ReleaseClient::new().expect("Failed to build client");

    let err = Pipeline::new(plan, &runner, &client)
        .pre_install()
        .expect_err("extract should fail");

    assert_eq!(
        failed_steps(&err),
        vec![
            Step::Extract,
            Step::InstallDependencies,
            Step::Build,
            Step::Package
        ]
    );
}
