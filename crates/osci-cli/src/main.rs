//! osci - Open Stage Control installer
//!
//! Usage:
//!   osci install        # Build and install the default release
//!   osci install --latest
//!   osci check          # Check the build toolchain
//!   osci paths          # Show where things will go
//!   osci clean          # Remove staged downloads

mod interactive;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use osci_core::config::{Overrides, Settings};
use osci_core::context::AppContext;
use osci_core::layout::APP_NAME;
use osci_core::pipeline::{InstallPlan, Pipeline, PipelineError, RunReport, cleanup_staging};
use osci_core::process::ProcessRunner;
use osci_core::release::ReleaseClient;
use osci_core::toolchain::{ToolReport, check_tools, default_tools};

use crate::interactive::ReplacePrompt;

#[derive(Parser)]
#[command(name = "osci")]
#[command(about = "Build and install Open Stage Control from source", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download, build, package and install a release
    Install(Box<InstallArgs>),

    /// Check that the build toolchain is available
    Check {
        /// npm executable to look for
        #[arg(long)]
        npm: Option<String>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the resolved download, staging and install paths
    Paths {
        #[command(flatten)]
        release: ReleaseArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove the staged archive and extracted sources
    Clean {
        #[command(flatten)]
        release: ReleaseArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

/// Release and location selection shared by every command that needs a layout.
#[derive(Args)]
struct ReleaseArgs {
    /// Release to use (e.g. 1.29.7 or v1.29.7)
    #[arg(long, conflicts_with = "latest")]
    version: Option<String>,
    /// Use the newest GitHub release
    #[arg(long)]
    latest: bool,
    /// GitHub repository (owner/name)
    #[arg(long)]
    repository: Option<String>,
    /// Target platform (darwin, linux, win32)
    #[arg(long)]
    platform: Option<String>,
    /// Target architecture (arm64, x64)
    #[arg(long)]
    arch: Option<String>,
    /// Directory the archive is downloaded and extracted into
    #[arg(long, value_name = "DIR")]
    staging_dir: Option<std::path::PathBuf>,
    /// Directory versioned installs are placed under
    #[arg(long, value_name = "DIR")]
    install_root: Option<std::path::PathBuf>,
}

#[derive(Args)]
struct InstallArgs {
    #[command(flatten)]
    release: ReleaseArgs,
    /// npm executable used for install, build and package
    #[arg(long)]
    npm: Option<String>,
    /// Keep the archive and extracted sources after installing
    #[arg(long)]
    keep_staging: bool,
    /// Skip all confirmation prompts
    #[arg(short = 'y', long)]
    yes: bool,
    /// Output format
    #[arg(short = 'o', long, default_value = "table")]
    format: OutputFormat,
}

impl ReleaseArgs {
    fn overrides(&self) -> Overrides {
        let version = if self.latest {
            Some("latest".to_string())
        } else {
            self.version.clone()
        };
        Overrides {
            version,
            repository: self.repository.clone(),
            platform: self.platform.clone(),
            arch: self.arch.clone(),
            staging_dir: self.staging_dir.clone(),
            install_root: self.install_root.clone(),
            ..Overrides::default()
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "osci=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let code = run_cli(cli.command)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn run_cli(command: Commands) -> Result<i32> {
    match command {
        Commands::Install(args) => run_install(*args),
        Commands::Check { npm, format } => run_check(npm, format),
        Commands::Paths { release, format } => {
            run_paths(release, format)?;
            Ok(0)
        }
        Commands::Clean { release, format } => {
            run_clean(release, format)?;
            Ok(0)
        }
    }
}

fn load_settings(overrides: &Overrides) -> Result<Settings> {
    let ctx = AppContext::from_env()?;
    let config = ctx.config_store().load()?;
    Settings::resolve(&config, overrides, &ctx)
}

fn resolve_plan(settings: &Settings, client: &ReleaseClient) -> Result<InstallPlan> {
    let version = settings.resolve_version(client)?;
    settings.plan(&version)
}

fn run_install(args: InstallArgs) -> Result<i32> {
    let mut overrides = args.release.overrides();
    overrides.npm = args.npm.clone();
    overrides.keep_staging = args.keep_staging;

    let settings = load_settings(&overrides)?;
    let client = ReleaseClient::new()?;
    let plan = resolve_plan(&settings, &client)?;

    let tools = check_tools(&default_tools(&settings.npm));
    if matches!(args.format, OutputFormat::Table) {
        for tool in tools.missing() {
            eprintln!(
                "⚠ {} not found on PATH (install with: {})",
                tool.name, tool.install_hint
            );
        }
    }

    let runner = ProcessRunner::new();
    let pipeline = Pipeline::new(plan, &runner, &client);

    if needs_replace_prompt(pipeline.has_existing_install(), args.yes, args.format)? {
        let confirmed = ReplacePrompt::new().confirm(pipeline.plan())?;
        if !confirmed {
            eprintln!("Cancelled.");
            return Ok(0);
        }
    }

    if matches!(args.format, OutputFormat::Table) {
        println!(
            "Installing {} {} ({})",
            APP_NAME,
            pipeline.plan().version,
            pipeline.plan().target
        );
    }

    match pipeline.run(settings.keep_staging) {
        Ok(report) => {
            print_install_result(args.format, &report)?;
            Ok(0)
        }
        Err(err) => {
            print_install_error(args.format, &err)?;
            Ok(1)
        }
    }
}

/// Whether to ask before replacing. JSON output is for scripts, so it never
/// prompts and needs `-y` to replace.
fn needs_replace_prompt(existing: bool, yes: bool, format: OutputFormat) -> Result<bool> {
    if !existing || yes {
        return Ok(false);
    }
    match format {
        OutputFormat::Table => Ok(true),
        OutputFormat::Json => {
            anyhow::bail!("An install already exists at this location; pass -y to replace it")
        }
    }
}

fn print_install_result(format: OutputFormat, report: &RunReport) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if report.install.replaced {
                println!("  Replaced previous install");
            }
            match &report.cleanup {
                Some(cleanup) => {
                    for path in &cleanup.removed {
                        println!("  Removed {}", path.display());
                    }
                }
                None => println!("  Kept staging files"),
            }
            println!(
                "✓ Installed {} {} to {}",
                APP_NAME,
                report.install.version,
                report.install.install_dir.display()
            );
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "installed",
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_install_error(format: OutputFormat, err: &PipelineError) -> Result<()> {
    match format {
        OutputFormat::Table => match err {
            PipelineError::PreInstall(failures) => {
                for failure in failures {
                    eprintln!("✗ {}", failure);
                }
            }
            other => eprintln!("✗ {}", other),
        },
        OutputFormat::Json => {
            let failures: Vec<_> = if err.failures().is_empty() {
                vec![serde_json::json!({
                    "step": err.step(),
                    "error": err.to_string(),
                })]
            } else {
                err.failures()
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "step": f.step,
                            "error": format!("{:#}", f.error),
                        })
                    })
                    .collect()
            };
            let output = serde_json::json!({
                "status": "failed",
                "failures": failures,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn run_check(npm: Option<String>, format: OutputFormat) -> Result<i32> {
    let overrides = Overrides {
        npm,
        ..Overrides::default()
    };
    let settings = load_settings(&overrides)?;
    let report = check_tools(&default_tools(&settings.npm));

    match format {
        OutputFormat::Table => print_tool_table(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if report.all_installed() { 0 } else { 1 })
}

fn print_tool_table(report: &ToolReport) {
    println!("  {:<10} {:<8} Path", "Tool", "Status");
    println!("{}", "-".repeat(60));
    for tool in &report.tools {
        match &tool.path {
            Some(path) => println!("  {:<10} {:<8} {}", tool.name, "✓", path.display()),
            None => println!(
                "  {:<10} {:<8} install with: {}",
                tool.name, "✗", tool.install_hint
            ),
        }
    }
}

fn run_paths(release: ReleaseArgs, format: OutputFormat) -> Result<()> {
    let settings = load_settings(&release.overrides())?;
    let client = ReleaseClient::new()?;
    let plan = resolve_plan(&settings, &client)?;

    match format {
        OutputFormat::Table => {
            let layout = &plan.layout;
            println!("Version:   {} ({})", plan.version, plan.target);
            println!("Source:    {}", plan.source_url);
            println!("Archive:   {}", layout.archive.display());
            println!("Sources:   {}", layout.extracted_dir.display());
            println!("Package:   {}", layout.packaged_bundle.display());
            println!("Install:   {}", layout.installed_bundle.display());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}

fn run_clean(release: ReleaseArgs, format: OutputFormat) -> Result<()> {
    let settings = load_settings(&release.overrides())?;
    let client = ReleaseClient::new()?;
    let version = settings.resolve_version(&client)?;
    let report = cleanup_staging(&settings.layout(&version))?;

    match format {
        OutputFormat::Table => {
            if report.removed.is_empty() {
                println!("• Nothing staged for {}", version);
            }
            for path in &report.removed {
                println!("✓ Removed {}", path.display());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
