//! Runs a plan: one step at a time, in order, against the shared manifest

use anyhow::{Context, Result};
use colored::Colorize;
use pkgkit::{Backend, NodeBackend, NpmBackend, ScoopBackend, WingetBackend};
use std::path::PathBuf;

use crate::dirscope::DirGuard;
use crate::hooks::HookRunner;
use crate::manifest::{Manifest, ManifestStore};
use crate::plan::Step;
use crate::reconcile::{
    BucketReconciler, EnvVarReconciler, LanguageServerReconciler, PackageReconciler,
    PackageSource, RepositoryReconciler, ScoopBootstrap, StepReport, UrlReconciler,
};
use crate::tools::{self, DialoguerPrompter, EnvStore, GitCli, Prompter, SystemLauncher, UrlLauncher, Vcs};
use crate::ui;

/// Run options that do not come from the manifest
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Default parent directory for repositories without a destination
    pub clone_dir: PathBuf,
    pub run_repo_startup: bool,
    pub package_filter: Option<Vec<String>>,
    pub language_server_filter: Option<Vec<String>>,
    /// Skip confirmation prompts
    pub assume_yes: bool,
}

/// External collaborators, one per concern
pub struct Toolset {
    pub scoop: Box<dyn Backend>,
    pub winget: Box<dyn Backend>,
    pub npm: Box<dyn NodeBackend>,
    pub vcs: Box<dyn Vcs>,
    pub env: Box<dyn EnvStore>,
    pub prompter: Box<dyn Prompter>,
    pub launcher: Box<dyn UrlLauncher>,
}

impl Toolset {
    /// The real tools for this machine.
    pub fn system() -> Result<Self> {
        Ok(Self {
            scoop: Box::new(ScoopBackend::new()),
            winget: Box::new(WingetBackend::new()),
            npm: Box::new(NpmBackend::new()),
            vcs: Box::new(GitCli),
            env: tools::env::default_store()?,
            prompter: Box::new(DialoguerPrompter),
            launcher: Box::new(SystemLauncher),
        })
    }
}

/// Reports of every step that ran
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<StepReport>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.reports.iter().all(StepReport::is_success)
    }

    pub fn changed(&self) -> usize {
        self.reports.iter().map(StepReport::changed).sum()
    }

    pub fn failed(&self) -> usize {
        self.reports
            .iter()
            .map(|r| r.failed() + r.errors.len())
            .sum()
    }

    pub fn report(&self, step: Step) -> Option<&StepReport> {
        self.reports.iter().find(|r| r.step == step)
    }

    pub fn print(&self) {
        println!();
        ui::header("Summary");
        for report in &self.reports {
            report.print_summary();
        }
        println!();
        if self.is_success() {
            ui::success(&format!("Done: {} change(s)", self.changed()));
        } else {
            println!(
                "{} {} change(s), {} failure(s)",
                "✗".red(),
                self.changed(),
                self.failed()
            );
        }
    }
}

pub struct Provisioner {
    settings: Settings,
    manifest: ManifestStore,
    hooks: HookRunner,
    tools: Toolset,
}

impl Provisioner {
    pub fn new(settings: Settings, manifest: ManifestStore, hooks: HookRunner, tools: Toolset) -> Self {
        Self {
            settings,
            manifest,
            hooks,
            tools,
        }
    }

    /// Run `steps` in order; the working directory is restored afterwards
    /// whatever happens inside.
    pub fn run(&self, steps: &[Step]) -> Result<RunSummary> {
        let guard = DirGuard::hold().context("Could not read the current directory")?;
        log::debug!("Running {} step(s) from {}", steps.len(), guard.previous().display());

        let mut summary = RunSummary::default();
        for (i, &step) in steps.iter().enumerate() {
            ui::step(i + 1, steps.len(), step.description());
            summary.reports.push(self.run_step(step));
        }

        summary.print();
        Ok(summary)
    }

    fn run_step(&self, step: Step) -> StepReport {
        let mut report = StepReport::new(step);

        if step == Step::InstallScoop {
            ScoopBootstrap::new(
                self.tools.scoop.as_ref(),
                self.tools.prompter.as_ref(),
                self.settings.assume_yes,
            )
            .reconcile(&mut report);
            return report;
        }

        let manifest = match self.manifest.load() {
            Ok(manifest) => manifest,
            Err(e) => {
                report.abort(e.into());
                return report;
            }
        };

        self.reconcile(step, manifest, &mut report);
        report
    }

    fn reconcile(&self, step: Step, manifest: &Manifest, report: &mut StepReport) {
        let tools = &self.tools;
        match step {
            Step::InstallScoop => {}
            Step::AddBuckets => {
                BucketReconciler::new(tools.scoop.as_ref()).reconcile(&manifest.scoop_packages, report);
            }
            Step::InstallPackages => {
                let sources = [
                    PackageSource {
                        backend: tools.scoop.as_ref(),
                        specs: &manifest.scoop_packages,
                    },
                    PackageSource {
                        backend: tools.winget.as_ref(),
                        specs: &manifest.winget_packages,
                    },
                ];
                PackageReconciler::new(&self.hooks).reconcile(
                    &sources,
                    self.settings.package_filter.as_deref(),
                    report,
                );
            }
            Step::InstallLanguageServers => {
                LanguageServerReconciler::new(tools.npm.as_ref()).reconcile(
                    &manifest.npm_packages,
                    self.settings.language_server_filter.as_deref(),
                    report,
                );
            }
            Step::CloneRepos => {
                RepositoryReconciler::new(tools.vcs.as_ref(), &self.hooks, &self.settings.clone_dir)
                    .with_startup(self.settings.run_repo_startup)
                    .reconcile(&manifest.repositories, report);
            }
            Step::LaunchUrls => {
                UrlReconciler::new(tools.launcher.as_ref()).reconcile(
                    &[
                        ("Edge extensions", manifest.edge_extensions.as_slice()),
                        ("Manual installs", manifest.manual_installs.as_slice()),
                    ],
                    report,
                );
            }
            Step::SetEnvVars => {
                EnvVarReconciler::new(tools.env.as_ref(), tools.prompter.as_ref())
                    .reconcile(&manifest.manual_env_var, report);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirscope::cwd_lock;
    use crate::error::StepError;
    use crate::manifest::{LanguageServerSpec, PackageSpec, RepositorySpec, UrlSpec};
    use crate::reconcile::Outcome;
    use crate::tools::env::ProfileEnvStore;
    use crate::tools::fake::{FakeGit, FakeLauncher, FakePrompter};
    use pkgkit::{Action, MockBackend, MockNodeBackend};
    use tempfile::TempDir;

    struct Harness {
        scoop: MockBackend,
        winget: MockBackend,
        npm: MockNodeBackend,
        dir: TempDir,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                scoop: MockBackend::new(),
                winget: MockBackend::new(),
                npm: MockNodeBackend::new(),
                dir: TempDir::new().unwrap(),
            }
        }

        fn clone_dir(&self) -> PathBuf {
            self.dir.path().canonicalize().unwrap().join("source")
        }

        fn env_file(&self) -> PathBuf {
            self.dir.path().join("env.sh")
        }

        fn provisioner(&self, manifest: ManifestStore, answers: &[&str]) -> Provisioner {
            let tools = Toolset {
                scoop: Box::new(self.scoop.clone()),
                winget: Box::new(self.winget.clone()),
                npm: Box::new(self.npm.clone()),
                vcs: Box::new(FakeGit::default()),
                env: Box::new(ProfileEnvStore::new(self.env_file())),
                prompter: Box::new(FakePrompter::answering(answers)),
                launcher: Box::new(FakeLauncher::default()),
            };
            let settings = Settings {
                clone_dir: self.clone_dir(),
                ..Settings::default()
            };
            Provisioner::new(settings, manifest, HookRunner::new(self.dir.path().join("hooks")), tools)
        }
    }

    fn manifest() -> Manifest {
        Manifest {
            scoop_packages: vec![PackageSpec {
                name: "vscode".into(),
                bucket: Some("extras".into()),
                description: None,
            }],
            winget_packages: vec![PackageSpec {
                name: "Microsoft.PowerToys".into(),
                bucket: None,
                description: None,
            }],
            npm_packages: vec![LanguageServerSpec {
                name: "pyright".into(),
                global: None,
                description: None,
            }],
            repositories: vec![RepositorySpec {
                url: "https://example.com/me/dotfiles.git".into(),
                destination: None,
                not_create_child_dir: false,
                description: None,
            }],
            manual_env_var: vec!["RIGUP_TEST_TOKEN_X1".into()],
            edge_extensions: vec![UrlSpec {
                name: Some("ext".into()),
                url: "https://ext".into(),
            }],
            manual_installs: Vec::new(),
        }
    }

    #[test]
    fn test_runs_steps_in_order_and_restores_cwd() {
        let _lock = cwd_lock();
        let h = Harness::new();
        let before = std::env::current_dir().unwrap();
        let p = h.provisioner(ManifestStore::preloaded(manifest()), &[]);

        let steps = [
            Step::AddBuckets,
            Step::InstallPackages,
            Step::InstallLanguageServers,
            Step::CloneRepos,
        ];
        let summary = p.run(&steps).unwrap();

        assert!(summary.is_success());
        let ran: Vec<Step> = summary.reports.iter().map(|r| r.step).collect();
        assert_eq!(ran, steps);
        assert_eq!(
            h.scoop.actions(),
            vec![
                Action::AddBucket("extras".into()),
                Action::Install("extras/vscode".into())
            ]
        );
        assert_eq!(
            h.winget.actions(),
            vec![Action::Install("Microsoft.PowerToys".into())]
        );
        assert_eq!(h.npm.actions().len(), 1);
        assert!(h.clone_dir().join("dotfiles").join(".git").is_dir());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_missing_manifest_aborts_only_dependent_steps() {
        let _lock = cwd_lock();
        let h = Harness::new();
        let store = ManifestStore::new(h.dir.path().join("nope.json"));
        let p = h.provisioner(store, &[]);

        let summary = p.run(&[Step::InstallScoop, Step::InstallPackages, Step::CloneRepos]).unwrap();

        assert!(!summary.is_success());
        let scoop = summary.report(Step::InstallScoop).unwrap();
        assert_eq!(scoop.outcome_of("mock"), Some(&Outcome::Kept));
        for step in [Step::InstallPackages, Step::CloneRepos] {
            let report = summary.report(step).unwrap();
            assert!(matches!(report.errors.as_slice(), [StepError::Manifest(_)]));
        }
        assert!(h.scoop.actions().is_empty());
    }

    #[test]
    fn test_package_filter_is_applied() {
        let _lock = cwd_lock();
        let h = Harness::new();
        let mut p = h.provisioner(ManifestStore::preloaded(manifest()), &[]);
        p.settings.package_filter = Some(vec!["microsoft.powertoys".into()]);

        p.run(&[Step::InstallPackages]).unwrap();

        assert!(h.scoop.actions().is_empty());
        assert_eq!(h.winget.actions().len(), 1);
    }

    #[test]
    fn test_env_vars_are_prompted_and_persisted() {
        let _lock = cwd_lock();
        let h = Harness::new();
        let p = h.provisioner(ManifestStore::preloaded(manifest()), &["secret"]);

        let summary = p.run(&[Step::SetEnvVars]).unwrap();

        assert!(summary.is_success());
        let written = std::fs::read_to_string(h.env_file()).unwrap();
        assert!(written.contains("export RIGUP_TEST_TOKEN_X1='secret'"));
    }

    #[test]
    fn test_failed_item_makes_run_unsuccessful() {
        let _lock = cwd_lock();
        let mut h = Harness::new();
        h.winget = MockBackend::new().with_failing(["Microsoft.PowerToys"]);
        let p = h.provisioner(ManifestStore::preloaded(manifest()), &[]);

        let summary = p.run(&[Step::InstallPackages]).unwrap();

        assert!(!summary.is_success());
        assert_eq!(summary.failed(), 1);
        assert_eq!(h.scoop.actions(), vec![Action::Install("extras/vscode".into())]);
    }
}
