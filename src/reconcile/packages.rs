//! Package reconciler (scoop, winget)

use anyhow::Result;
use pkgkit::Backend;

use super::{Outcome, StepReport, report_no_match, select_by_name};
use crate::error::StepError;
use crate::hooks::HookRunner;
use crate::manifest::PackageSpec;
use crate::ui;

/// Declared packages and the package manager that provides them
pub struct PackageSource<'a> {
    pub backend: &'a dyn Backend,
    pub specs: &'a [PackageSpec],
}

pub struct PackageReconciler<'a> {
    hooks: &'a HookRunner,
}

impl<'a> PackageReconciler<'a> {
    pub fn new(hooks: &'a HookRunner) -> Self {
        Self { hooks }
    }

    /// Converge every source, optionally limited to the names in `filter`.
    ///
    /// The filter applies across all sources; if it matches nothing the
    /// available names are listed and nothing is touched. A source whose tool
    /// is missing is aborted on its own.
    pub fn reconcile(
        &self,
        sources: &[PackageSource<'_>],
        filter: Option<&[String]>,
        report: &mut StepReport,
    ) {
        let all: Vec<PackageSpec> = sources.iter().flat_map(|s| s.specs.iter().cloned()).collect();
        if let Err(available) = select_by_name(&all, filter, |p| p.name.as_str()) {
            report_no_match("packages", filter, &available);
            return;
        }

        for source in sources {
            // Unknown names were already warned about above
            let selected: Vec<&PackageSpec> = match filter.filter(|f| !f.is_empty()) {
                Some(f) => source
                    .specs
                    .iter()
                    .filter(|p| f.iter().any(|n| n.eq_ignore_ascii_case(&p.name)))
                    .collect(),
                None => source.specs.iter().collect(),
            };
            if selected.is_empty() {
                continue;
            }

            let backend = source.backend;
            if !backend.is_available() {
                report.abort(StepError::tool_not_available(backend.tool()));
                continue;
            }

            ui::section(&format!("{} packages", backend.tool()));
            for spec in selected {
                let outcome = match self.reconcile_one(backend, spec) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        ui::warn(&format!("Failed to reconcile {}: {e:#}", spec.name));
                        Outcome::failed(&e)
                    }
                };
                report.record(&spec.name, outcome);
            }
        }
    }

    fn reconcile_one(&self, backend: &dyn Backend, spec: &PackageSpec) -> Result<Outcome> {
        let package = spec.to_package();
        let id = package.qualified_name();

        let outcome = if backend.is_installed(&spec.name)? {
            // Update by the bare name, the same key the install lookup used
            backend.update(&spec.name)?;
            ui::success(&format!("{} is already installed (updated)", spec.name));
            Outcome::Updated
        } else {
            if let Some(description) = &spec.description {
                ui::dim(description);
            }
            ui::info(&format!("Installing {id}..."));
            backend.install(&package)?;
            ui::success(&format!("Installed {id}"));
            Outcome::Installed
        };

        self.run_post_install(&spec.name);
        Ok(outcome)
    }

    /// Hook failures are reported but leave the package outcome alone.
    fn run_post_install(&self, name: &str) {
        match self.hooks.run_post_install(name) {
            Ok(true) => ui::success(&format!("Post-install script for {name} completed")),
            Ok(false) => {}
            Err(e) => ui::warn(&format!("{e:#}")),
        }
    }
}
