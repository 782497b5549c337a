//! Repository reconciler (git)
//!
//! Missing clones are cloned; existing ones are pulled from inside their
//! directory, with the working directory restored afterwards whatever the
//! pull does.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::{Outcome, StepReport};
use crate::dirscope;
use crate::error::StepError;
use crate::hooks::HookRunner;
use crate::manifest::RepositorySpec;
use crate::paths;
use crate::tools::Vcs;
use crate::ui;

/// Where a repository lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    /// Parent directory to create before cloning
    pub destination: PathBuf,
    pub repo_name: String,
    /// Directory the repository is cloned into
    pub target: PathBuf,
}

impl RepoLocation {
    /// Resolve a declared repository against the default clone root.
    ///
    /// A declared `destination` has environment references expanded and, if
    /// still relative, is taken relative to `clone_root`.
    pub fn resolve(spec: &RepositorySpec, clone_root: &Path) -> Self {
        let destination = spec
            .destination
            .as_deref()
            .map(|d| paths::resolve(d, clone_root))
            .unwrap_or_else(|| clone_root.to_path_buf());
        let repo_name = spec.repo_name();
        let target = if spec.not_create_child_dir {
            destination.clone()
        } else {
            destination.join(&repo_name)
        };

        Self {
            destination,
            repo_name,
            target,
        }
    }
}

pub struct RepositoryReconciler<'a> {
    vcs: &'a dyn Vcs,
    hooks: &'a HookRunner,
    clone_root: &'a Path,
    run_startup: bool,
}

impl<'a> RepositoryReconciler<'a> {
    pub fn new(vcs: &'a dyn Vcs, hooks: &'a HookRunner, clone_root: &'a Path) -> Self {
        Self {
            vcs,
            hooks,
            clone_root,
            run_startup: false,
        }
    }

    /// Run each repository's startup script after it is reconciled.
    pub fn with_startup(mut self, enabled: bool) -> Self {
        self.run_startup = enabled;
        self
    }

    pub fn reconcile(&self, specs: &[RepositorySpec], report: &mut StepReport) {
        if specs.is_empty() {
            ui::info("No repositories declared");
            return;
        }
        if !self.vcs.is_available() {
            report.abort(StepError::tool_not_available("git"));
            return;
        }

        for spec in specs {
            let location = RepoLocation::resolve(spec, self.clone_root);
            let outcome = match self.reconcile_one(spec, &location) {
                Ok(outcome) => outcome,
                Err(e) => {
                    ui::warn(&format!("Failed to reconcile {}: {e:#}", spec.url));
                    Outcome::failed(&e)
                }
            };
            report.record(&location.repo_name, outcome);
        }
    }

    fn reconcile_one(&self, spec: &RepositorySpec, location: &RepoLocation) -> Result<Outcome> {
        let outcome = if needs_clone(&location.target) {
            std::fs::create_dir_all(&location.destination).with_context(|| {
                format!("Could not create {}", location.destination.display())
            })?;
            if let Some(description) = &spec.description {
                ui::dim(description);
            }
            ui::info(&format!(
                "Cloning {} into {}...",
                spec.url,
                location.target.display()
            ));
            self.vcs.clone_repo(&spec.url, &location.target)?;
            ui::success(&format!("Cloned {}", location.repo_name));
            Outcome::Cloned
        } else {
            ui::info(&format!(
                "{} already cloned, pulling latest changes...",
                location.repo_name
            ));
            dirscope::within(&location.target, || self.vcs.pull())?;
            ui::success(&format!("Pulled {}", location.repo_name));
            Outcome::Pulled
        };

        if self.run_startup
            && self
                .hooks
                .run_repo_startup(&location.repo_name, &location.target)?
        {
            ui::success(&format!("Startup script for {} completed", location.repo_name));
        }

        Ok(outcome)
    }
}

/// A missing directory, or an empty one we created earlier, gets a fresh clone.
fn needs_clone(target: &Path) -> bool {
    match std::fs::read_dir(target) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => !target.exists(),
    }
}
