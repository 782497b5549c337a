//! Opens browser pages for things that cannot be installed unattended
//! (browser extensions, vendor downloads).

use super::{Outcome, StepReport};
use crate::manifest::UrlSpec;
use crate::tools::UrlLauncher;
use crate::ui;

pub struct UrlReconciler<'a> {
    launcher: &'a dyn UrlLauncher,
}

impl<'a> UrlReconciler<'a> {
    pub fn new(launcher: &'a dyn UrlLauncher) -> Self {
        Self { launcher }
    }

    /// Open every entry of each named group, in order.
    pub fn reconcile(&self, groups: &[(&str, &[UrlSpec])], report: &mut StepReport) {
        if groups.iter().all(|(_, specs)| specs.is_empty()) {
            ui::info("No URLs declared");
            return;
        }

        for (title, specs) in groups {
            if specs.is_empty() {
                continue;
            }
            ui::section(title);
            for spec in *specs {
                let label = spec.label();
                ui::info(&format!("Opening {label}"));
                let outcome = match self.launcher.open(&spec.url) {
                    Ok(()) => Outcome::Launched,
                    Err(e) => {
                        ui::warn(&format!("Could not open {}: {e:#}", spec.url));
                        Outcome::failed(&e)
                    }
                };
                report.record(label, outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Step;
    use crate::tools::fake::FakeLauncher;

    fn url(name: Option<&str>, url: &str) -> UrlSpec {
        UrlSpec {
            name: name.map(ToString::to_string),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_opens_all_groups_in_order() {
        let launcher = FakeLauncher::default();
        let extensions = [url(Some("uBlock"), "https://ext/ublock")];
        let installs = [url(None, "https://vendor/download")];
        let mut report = StepReport::new(Step::LaunchUrls);

        UrlReconciler::new(&launcher).reconcile(
            &[("Edge extensions", &extensions[..]), ("Manual installs", &installs[..])],
            &mut report,
        );

        assert_eq!(
            *launcher.opened.borrow(),
            vec!["https://ext/ublock".to_string(), "https://vendor/download".to_string()]
        );
        assert_eq!(report.outcome_of("uBlock"), Some(&Outcome::Launched));
        assert_eq!(
            report.outcome_of("https://vendor/download"),
            Some(&Outcome::Launched)
        );
    }

    #[test]
    fn test_failed_open_continues() {
        let mut launcher = FakeLauncher::default();
        launcher.fail.insert("https://bad".to_string());
        let specs = [url(None, "https://bad"), url(None, "https://good")];
        let mut report = StepReport::new(Step::LaunchUrls);

        UrlReconciler::new(&launcher).reconcile(&[("Manual installs", &specs[..])], &mut report);

        assert!(report.outcome_of("https://bad").unwrap().is_failure());
        assert_eq!(report.outcome_of("https://good"), Some(&Outcome::Launched));
    }
}
