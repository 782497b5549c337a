//! Language-server reconciler (npm)
//!
//! Global packages are checked against `npm list -g`. Local installs are not
//! tracked between runs, so they are always installed again.

use anyhow::Result;
use pkgkit::{InstallScope, NodeBackend};

use super::{Outcome, StepReport, report_no_match, select_by_name};
use crate::error::StepError;
use crate::manifest::LanguageServerSpec;
use crate::ui;

pub struct LanguageServerReconciler<'a> {
    npm: &'a dyn NodeBackend,
}

impl<'a> LanguageServerReconciler<'a> {
    pub fn new(npm: &'a dyn NodeBackend) -> Self {
        Self { npm }
    }

    pub fn reconcile(
        &self,
        specs: &[LanguageServerSpec],
        filter: Option<&[String]>,
        report: &mut StepReport,
    ) {
        if !self.npm.is_available() {
            report.abort(StepError::tool_not_available("npm"));
            return;
        }

        let selected = match select_by_name(specs, filter, |s| s.name.as_str()) {
            Ok(selected) => selected,
            Err(available) => {
                report_no_match("language servers", filter, &available);
                return;
            }
        };

        for spec in selected {
            let outcome = match self.reconcile_one(spec) {
                Ok(outcome) => outcome,
                Err(e) => {
                    ui::warn(&format!("Failed to reconcile {}: {e:#}", spec.name));
                    Outcome::failed(&e)
                }
            };
            report.record(&spec.name, outcome);
        }
    }

    fn reconcile_one(&self, spec: &LanguageServerSpec) -> Result<Outcome> {
        let scope = spec.scope();

        if self.is_installed(&spec.name, scope)? {
            ui::info(&format!("Updating {} ({scope})...", spec.name));
            self.npm.update(&spec.name, scope)?;
            ui::success(&format!("{} is already installed (updated)", spec.name));
            return Ok(Outcome::Updated);
        }

        if let Some(description) = &spec.description {
            ui::dim(description);
        }
        ui::info(&format!("Installing {} ({scope})...", spec.name));
        self.npm.install(&spec.name, scope)?;
        ui::success(&format!("Installed {}", spec.name));
        Ok(Outcome::Installed)
    }

    fn is_installed(&self, name: &str, scope: InstallScope) -> Result<bool> {
        match scope {
            InstallScope::Global => Ok(self.npm.list_global()?.iter().any(|n| n == name)),
            InstallScope::Local => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Step;
    use pkgkit::{MockNodeBackend, NodeAction};

    fn spec(name: &str, global: Option<bool>) -> LanguageServerSpec {
        LanguageServerSpec {
            name: name.to_string(),
            global,
            description: None,
        }
    }

    fn run(npm: &MockNodeBackend, specs: &[LanguageServerSpec], filter: Option<&[String]>) -> StepReport {
        let mut report = StepReport::new(Step::InstallLanguageServers);
        LanguageServerReconciler::new(npm).reconcile(specs, filter, &mut report);
        report
    }

    #[test]
    fn test_missing_npm_aborts_step() {
        let npm = MockNodeBackend::unavailable();
        let report = run(&npm, &[spec("pyright", None)], None);

        assert!(npm.actions().is_empty());
        assert!(matches!(
            report.errors.as_slice(),
            [StepError::ToolNotAvailable { tool }] if tool == "npm"
        ));
    }

    #[test]
    fn test_global_default_install_then_update() {
        let npm = MockNodeBackend::new();
        let specs = [spec("pyright", None)];

        run(&npm, &specs, None);
        run(&npm, &specs, None);

        assert_eq!(
            npm.actions(),
            vec![
                NodeAction::Install("pyright".into(), InstallScope::Global),
                NodeAction::Update("pyright".into(), InstallScope::Global),
            ]
        );
    }

    #[test]
    fn test_local_always_installs() {
        let npm = MockNodeBackend::new();
        let specs = [spec("eslint", Some(false))];

        run(&npm, &specs, None);
        let report = run(&npm, &specs, None);

        assert_eq!(
            npm.actions(),
            vec![
                NodeAction::Install("eslint".into(), InstallScope::Local),
                NodeAction::Install("eslint".into(), InstallScope::Local),
            ]
        );
        assert_eq!(report.outcome_of("eslint"), Some(&Outcome::Installed));
    }

    #[test]
    fn test_failure_continues_with_next() {
        let npm = MockNodeBackend::new().with_failing(["bad-ls"]);
        let specs = [spec("bad-ls", None), spec("typescript", None)];

        let report = run(&npm, &specs, None);

        assert!(report.outcome_of("bad-ls").unwrap().is_failure());
        assert_eq!(report.outcome_of("typescript"), Some(&Outcome::Installed));
    }

    #[test]
    fn test_filter_without_match_does_nothing() {
        let npm = MockNodeBackend::new().with_global(["pyright"]);
        let specs = [spec("pyright", None)];
        let filter = vec!["gopls".to_string()];

        let report = run(&npm, &specs, Some(&filter));

        assert!(npm.actions().is_empty());
        assert!(report.items.is_empty());
    }
}
