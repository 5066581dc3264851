//! osci Core Library
//!
//! Builds Open Stage Control from a tagged source release and installs the
//! packaged application: download, extract, `npm install`, build, package,
//! copy into place, clean up.

pub mod config;
pub mod context;
pub mod extract;
pub mod fetch;
pub mod fs;
pub mod layout;
pub mod pipeline;
pub mod process;
pub mod receipt;
pub mod release;
pub mod target;
pub mod toolchain;
pub mod version;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, OsciConfig, Overrides, Settings};
    pub use crate::context::AppContext;

    // Pipeline
    pub use crate::layout::StagingLayout;
    pub use crate::pipeline::{
        InstallPlan, InstallReport, Pipeline, PipelineError, RunReport, Step, StepFailure,
    };
    pub use crate::process::{CommandRunner, CommandSpec, ProcessRunner};
    pub use crate::release::ReleaseClient;

    // Release selection
    pub use crate::target::{Arch, Platform, Target};
    pub use crate::version::ReleaseVersion;
}
