//! Confirmation before replacing an existing install.
//!
//! Uses dialoguer for the prompt and console for styling.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};

use osci_core::pipeline::InstallPlan;
use osci_core::receipt::InstallReceipt;

/// Shows what is about to be replaced and asks whether to go ahead.
pub struct ReplacePrompt<W: Write = io::Stderr> {
    /// Output writer (for testing)
    writer: W,
    theme: ColorfulTheme,
}

impl ReplacePrompt<io::Stderr> {
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl<W: Write> ReplacePrompt<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Print the existing install and the one that will replace it.
    pub fn print_summary(&mut self, plan: &InstallPlan) -> Result<()> {
        let layout = &plan.layout;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Existing install found").bold().yellow())?;
        writeln!(self.writer, "  {}", style("─".repeat(40)).dim())?;
        writeln!(
            self.writer,
            "  Path:      {}",
            style(layout.installed_bundle.display()).cyan()
        )?;

        match InstallReceipt::load(&layout.install_dir) {
            Ok(Some(receipt)) => {
                writeln!(
                    self.writer,
                    "  Installed: {} ({})",
                    style(&receipt.version).green(),
                    receipt.installed_at.format("%Y-%m-%d %H:%M UTC")
                )?;
            }
            Ok(None) => {
                writeln!(self.writer, "  Installed: {}", style("unknown").dim())?;
            }
            Err(e) => {
                writeln!(self.writer, "  Installed: {} ({:#})", style("unreadable").red(), e)?;
            }
        }

        writeln!(
            self.writer,
            "  Replacing: {} ({})",
            style(&plan.version).green(),
            plan.target
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    /// Ask before replacing; defaults to no.
    pub fn confirm(&mut self, plan: &InstallPlan) -> Result<bool> {
        self.print_summary(plan)?;
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Replace the existing install?")
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}
