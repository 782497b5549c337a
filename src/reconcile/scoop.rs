//! Installs scoop itself when it is missing.

use anyhow::{Context, Result, bail};
use pkgkit::Backend;

use super::{Outcome, StepReport};
use crate::error::StepError;
use crate::runner;
use crate::tools::Prompter;
use crate::ui;

/// Official installer, run through PowerShell
const INSTALL_COMMAND: &str = "irm get.scoop.sh | iex";

pub struct ScoopBootstrap<'a> {
    backend: &'a dyn Backend,
    prompter: &'a dyn Prompter,
    assume_yes: bool,
    installer: fn() -> Result<()>,
}

impl<'a> ScoopBootstrap<'a> {
    pub fn new(backend: &'a dyn Backend, prompter: &'a dyn Prompter, assume_yes: bool) -> Self {
        Self {
            backend,
            prompter,
            assume_yes,
            installer: run_official_installer,
        }
    }

    pub fn with_installer(mut self, installer: fn() -> Result<()>) -> Self {
        self.installer = installer;
        self
    }

    /// No-op when scoop is already callable.
    pub fn reconcile(&self, report: &mut StepReport) {
        let tool = self.backend.tool();
        if self.backend.is_available() {
            ui::success(&format!("{tool} is already installed"));
            report.record(tool, Outcome::Kept);
            return;
        }

        ui::info(&format!("{tool} is not installed."));
        if !self.assume_yes {
            match self.prompter.confirm(&format!("Install {tool} now?"), true) {
                Ok(true) => {}
                Ok(false) => {
                    ui::warn(&format!("Skipping {tool} installation"));
                    report.record(
                        tool,
                        Outcome::Skipped {
                            reason: "declined".to_string(),
                        },
                    );
                    return;
                }
                Err(e) => {
                    report.abort(StepError::Other(e));
                    return;
                }
            }
        }

        ui::info(&format!("Installing {tool}..."));
        if let Err(e) = (self.installer)() {
            report.abort(StepError::Other(e));
            return;
        }

        if !self.backend.is_available() {
            report.abort(StepError::Other(anyhow::anyhow!(
                "{tool} installer finished but `{tool}` is still not on PATH; restart your shell"
            )));
            return;
        }

        ui::success(&format!("{tool} installed successfully!"));
        report.record(tool, Outcome::Installed);
    }
}

fn run_official_installer() -> Result<()> {
    if !cfg!(windows) {
        bail!("scoop can only be installed on Windows");
    }

    let status = runner::run(
        "powershell",
        &[
            "-NoProfile",
            "-ExecutionPolicy",
            "RemoteSigned",
            "-Command",
            INSTALL_COMMAND,
        ],
    )
    .context("Failed to run the scoop installer")?;

    if !status.success() {
        bail!("scoop installer exited with status {status}");
    }
    Ok(())
}
