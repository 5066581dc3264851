//! `std::process` backed runner.

use std::process::{Command, Stdio};

use anyhow::Context;
use tracing::{debug, info};

use super::{CommandRunner, CommandSpec};

/// Spawns commands with inherited stdio so build output reaches the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    quiet: bool,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard child stdout; stderr is captured and attached to failures.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<()> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        info!(command = %spec, "running");
        if let Some(dir) = &spec.cwd {
            debug!(cwd = %dir.display());
        }

        if self.quiet {
            let output = cmd
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .output()
                .with_context(|| format!("Failed to run {}", spec))?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                anyhow::bail!(
                    "Command `{}` failed ({}): {}",
                    spec,
                    describe_status(output.status),
                    stderr.trim()
                );
            }
            return Ok(());
        }

        let status = cmd
            .status()
            .with_context(|| format!("Failed to run {}", spec))?;
        if !status.success() {
            anyhow::bail!("Command `{}` failed ({})", spec, describe_status(status));
        }
        Ok(())
    }
}

fn describe_status(status: std::process::ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
