//! External command execution.
//!
//! The pipeline never spawns processes directly: it builds a [`CommandSpec`]
//! and hands it to a [`CommandRunner`]. [`ProcessRunner`] is the real
//! implementation; tests substitute a recorder.
//!
//! ## npm steps
//!
//! | Step                 | Command            | Extra env          |
//! |----------------------|--------------------|--------------------|
//! | install dependencies | `npm install`      |                    |
//! | build                | `npm run build`    |                    |
//! | package              | `npm run package`  | `PLATFORM`, `ARCH` |

mod runner;

pub use runner::ProcessRunner;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::target::Target;

/// Default npm executable.
pub const DEFAULT_NPM: &str = "npm";

/// Executable specification for one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Added on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs external commands to completion.
pub trait CommandRunner {
    /// Run `spec`; a spawn failure or non-zero exit is an error.
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<()>;
}

/// `npm install` in the extracted source tree.
pub fn npm_install(npm: &str, source_dir: &Path) -> CommandSpec {
    CommandSpec::new(npm).arg("install").current_dir(source_dir)
}

/// `npm run build` in the extracted source tree.
pub fn npm_build(npm: &str, source_dir: &Path) -> CommandSpec {
    CommandSpec::new(npm)
        .args(["run", "build"])
        .current_dir(source_dir)
}

/// `npm run package` with the target exported as `PLATFORM`/`ARCH`.
pub fn npm_package(npm: &str, source_dir: &Path, target: Target) -> CommandSpec {
    let mut spec = CommandSpec::new(npm)
        .args(["run", "package"])
        .current_dir(source_dir);
    for (key, value) in target.env() {
        spec = spec.env(key, value);
    }
    spec
}
