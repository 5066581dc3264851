#![allow(dead_code)]

pub mod http;

use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

use osci_core::config::{OsciConfig, Overrides, Settings};
use osci_core::context::AppContext;
use osci_core::pipeline::InstallPlan;
use osci_core::process::{CommandRunner, CommandSpec};
use osci_core::version::ReleaseVersion;
use tempfile::TempDir;

/// Records every command instead of running it.
///
/// `npm run package` materialises a fake bundle at `bundle` so install has
/// something to copy; any command whose args contain `fail_on` errors.
pub struct RecordingRunner {
    pub calls: RefCell<Vec<CommandSpec>>,
    bundle: Option<PathBuf>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            bundle: None,
            fail_on: None,
        }
    }

    pub fn packaging_to(mut self, bundle: &Path) -> Self {
        self.bundle = Some(bundle.to_path_buf());
        self
    }

    pub fn failing_on(mut self, arg: &str) -> Self {
        self.fail_on = Some(arg.to_string());
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<()> {
        self.calls.borrow_mut().push(spec.clone());

        if let Some(fail) = &self.fail_on {
            if spec.args.iter().any(|a| a == fail) {
                anyhow::bail!("Command `{}` failed (exit code 1)", spec);
            }
        }

        if spec.args.iter().any(|a| a == "package") {
            if let Some(bundle) = &self.bundle {
                std::fs::create_dir_all(bundle.join("Contents/MacOS"))?;
                std::fs::write(bundle.join("Contents/Info.plist"), "plist")?;
                std::fs::write(bundle.join("Contents/MacOS/open-stage-control"), "bin")?;
            }
        }
        Ok(())
    }
}

/// Build a zip in memory.
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buf);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, body) in entries {
            zip.start_file(*name, options).expect("Failed to start zip entry");
            zip.write_all(body.as_bytes())
                .expect("Failed to write zip entry");
        }
        zip.finish().expect("Failed to finish zip");
    }
    buf.into_inner()
}

/// A darwin/arm64 plan rooted in a temp directory.
pub fn temp_plan(temp: &TempDir, version: &str) -> InstallPlan {
    let ctx = AppContext::new(temp.path().join("home"), temp.path().join("config"));
    let overrides = Overrides {
        staging_dir: Some(temp.path().join("stage")),
        install_root: Some(temp.path().join("Applications").join("Open Stage Control")),
        platform: Some("darwin".to_string()),
        arch: Some("arm64".to_string()),
        ..Overrides::default()
    };
    let settings = Settings::resolve(&OsciConfig::default(), &overrides, &ctx)
        .expect("Failed to resolve settings");
    let version = ReleaseVersion::parse(version).expect("Failed to parse version");
    settings.plan(&version).expect("Failed to build plan")
}

/// Stage a source archive for `plan` so no download is attempted.
pub fn stage_source_archive(plan: &InstallPlan) {
    let root = plan
        .layout
        .extracted_dir
        .file_name()
        .and_then(|n| n.to_str())
        .expect("extracted dir has a name")
        .to_string();
    let manifest = format!("{}/package.json", root);
    let entry = format!("{}/src/index.js", root);
    let archive = build_zip(&[
        (manifest.as_str(), "{\"name\":\"open-stage-control\"}"),
        (entry.as_str(), "// app"),
    ]);
    std::fs::create_dir_all(&plan.layout.staging_dir).expect("Failed to create staging dir");
    std::fs::write(&plan.layout.archive, archive).expect("Failed to write archive");
}

/// A URL nothing listens on.
pub fn unreachable_url() -> url::Url {
    url::Url::parse("http://127.0.0.1:9/v0.0.0.zip").expect("valid url")
}
