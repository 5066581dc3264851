use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Pipeline steps in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Download,
    Extract,
    InstallDependencies,
    Build,
    Package,
    Install,
    Cleanup,
}

impl Step {
    /// Steps whose failures are collected instead of stopping the run.
    pub const PRE_INSTALL: [Step; 5] = [
        Step::Download,
        Step::Extract,
        Step::InstallDependencies,
        Step::Build,
        Step::Package,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Download => "download",
            Step::Extract => "extract",
            Step::InstallDependencies => "install dependencies",
            Step::Build => "build",
            Step::Package => "package",
            Step::Install => "install",
            Step::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pre-install step and the error it returned.
#[derive(Debug)]
pub struct StepFailure {
    pub step: Step,
    pub error: anyhow::Error,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {:#}", self.step, self.error)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Pre-install failed ({} step(s)):\n{}", .0.len(), list_failures(.0))]
    PreInstall(Vec<StepFailure>),

    #[error("Install failed: {0:#}")]
    Install(anyhow::Error),

    #[error("Cleanup failed: {0:#}")]
    Cleanup(anyhow::Error),
}

impl PipelineError {
    /// The step that stopped the run; the first failure for pre-install.
    pub fn step(&self) -> Step {
        match self {
            PipelineError::PreInstall(failures) => {
                failures.first().map(|f| f.step).unwrap_or(Step::Download)
            }
            PipelineError::Install(_) => Step::Install,
            PipelineError::Cleanup(_) => Step::Cleanup,
        }
    }

    pub fn failures(&self) -> &[StepFailure] {
        match self {
            PipelineError::PreInstall(failures) => failures,
            PipelineError::Install(_) | PipelineError::Cleanup(_) => &[],
        }
    }
}

fn list_failures(failures: &[StepFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}
