//! Download and release lookups against a local HTTP server.

mod support;

use osci_core::fetch::{FetchOutcome, fetch_archive};
use osci_core::pipeline::Pipeline;
use osci_core::release::ReleaseClient;
use tempfile::TempDir;

use support::http::{Route, serve};
use support::{RecordingRunner, build_zip, temp_plan};

#[test]
fn fetch_writes_served_archive_and_reports_digest() {
    let body = b"PK fake archive bytes".to_vec();
    let base = serve(vec![("/v1.29.7.zip", Route::ok(body.clone()))]);
    let url = base.join("v1.29.7.zip").unwrap();

    let temp = TempDir::new().unwrap();
    let plan = temp_plan(&temp, "1.29.7");
    let client = ReleaseClient::new().unwrap();

    let outcome = fetch_archive(&client, &url, &plan.layout).unwrap();

    assert_eq!(
        outcome,
        FetchOutcome::Downloaded {
            bytes: body.len() as u64,
            blake3: blake3::hash(&body).to_hex().to_string(),
        }
    );
    assert_eq!(std::fs::read(&plan.layout.archive).unwrap(), body);

    let again = fetch_archive(&client, &url, &plan.layout).unwrap();
    assert_eq!(again, FetchOutcome::AlreadyPresent);
}

#[test]
fn probe_names_status_and_url() {
    let base = serve(vec![]);
    let url = base.join("v9.9.9.zip").unwrap();
    let client = ReleaseClient::new().unwrap();

    let err = client.probe(&url).unwrap_err().to_string();
    assert!(err.contains("404"), "{err}");
    assert!(err.contains(url.as_str()), "{err}");
}

#[test]
fn download_names_status_and_url() {
    let base = serve(vec![("/broken.zip", Route::status(500))]);
    let url = base.join("broken.zip").unwrap();
    let client = ReleaseClient::new().unwrap();

    let err = client.download(&url).unwrap_err().to_string();
    assert!(err.contains("500"), "{err}");
    assert!(err.contains(url.as_str()), "{err}");
}

#[test]
fn missing_release_fails_download_without_writing() {
    let base = serve(vec![]);
    let url = base.join("v1.29.7.zip").unwrap();

    let temp = TempDir::new().unwrap();
    let plan = temp_plan(&temp, "1.29.7");
    let client = ReleaseClient::new().unwrap();

    let err = fetch_archive(&client, &url, &plan.layout).unwrap_err();
    assert!(format!("{:#}", err).contains("404"));
    assert!(!plan.layout.archive.exists());
}

#[test]
fn latest_version_reads_tag_from_api() {
    let base = serve(vec![(
        "/repos/acme/osc/releases/latest",
        Route::ok(r#"{"tag_name":"v1.30.2","name":"1.30.2"}"#),
    )]);
    let client = ReleaseClient::new().unwrap().with_api_base(base.as_str());

    let version = client.latest_version("acme/osc").unwrap();
    assert_eq!(version.to_string(), "1.30.2");
}

#[test]
fn latest_version_reports_api_errors() {
    let base = serve(vec![]);
    let client = ReleaseClient::new().unwrap().with_api_base(base.as_str());

    let err = client.latest_version("acme/osc").unwrap_err().to_string();
    assert!(err.contains("404"), "{err}");
}

#[test]
fn pre_install_downloads_then_builds() {
    let temp = TempDir::new().unwrap();
    let mut plan = temp_plan(&temp, "1.29.7");
    let archive = build_zip(&[
        ("open-stage-control-1.29.7/package.json", "{}"),
        ("open-stage-control-1.29.7/src/index.js", "// app"),
    ]);
    let base = serve(vec![("/v1.29.7.zip", Route::ok(archive))]);
    plan.source_url = base.join("v1.29.7.zip").unwrap();

    let runner = RecordingRunner::new().packaging_to(&plan.layout.packaged_bundle);
    let client = ReleaseClient::new().unwrap();
    let report = Pipeline::new(plan, &runner, &client)
        .pre_install()
        .unwrap();

    assert!(matches!(
        report.download,
        Some(FetchOutcome::Downloaded { .. })
    ));
    assert_eq!(
        runner.commands(),
        vec!["npm install", "npm run build", "npm run package"]
    );
}
