//! Step selection: turns command-line toggles into an ordered run plan

use colored::Colorize;

use crate::ui;

/// Provisioning steps, declared in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    InstallScoop,
    AddBuckets,
    InstallPackages,
    InstallLanguageServers,
    CloneRepos,
    LaunchUrls,
    SetEnvVars,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::InstallScoop,
        Step::AddBuckets,
        Step::InstallPackages,
        Step::InstallLanguageServers,
        Step::CloneRepos,
        Step::LaunchUrls,
        Step::SetEnvVars,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::InstallScoop => "install-scoop",
            Step::AddBuckets => "add-buckets",
            Step::InstallPackages => "install-packages",
            Step::InstallLanguageServers => "install-language-servers",
            Step::CloneRepos => "clone-repos",
            Step::LaunchUrls => "launch-urls",
            Step::SetEnvVars => "set-env-vars",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::InstallScoop => "Install scoop",
            Step::AddBuckets => "Add scoop buckets",
            Step::InstallPackages => "Install or update scoop and winget packages",
            Step::InstallLanguageServers => "Install or update language servers (npm)",
            Step::CloneRepos => "Clone or pull repositories",
            Step::LaunchUrls => "Open extension and manual-install pages",
            Step::SetEnvVars => "Prompt for user environment variables",
        }
    }

    /// Interactive steps never run as part of `--all`.
    pub fn in_run_all(self) -> bool {
        !matches!(self, Step::LaunchUrls | Step::SetEnvVars)
    }
}

/// Step toggles as given on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepFlags {
    pub install_scoop: bool,
    pub add_buckets: bool,
    pub install_packages: bool,
    pub install_language_servers: bool,
    pub clone_repos: bool,
    pub launch_urls: bool,
    pub set_env_vars: bool,
    pub all: bool,
    pub skip_repo_clone: bool,
}

impl StepFlags {
    fn requested(&self, step: Step) -> bool {
        let explicit = match step {
            Step::InstallScoop => self.install_scoop,
            Step::AddBuckets => self.add_buckets,
            Step::InstallPackages => self.install_packages,
            Step::InstallLanguageServers => self.install_language_servers,
            Step::CloneRepos => self.clone_repos,
            Step::LaunchUrls => self.launch_urls,
            Step::SetEnvVars => self.set_env_vars,
        };
        explicit || (self.all && step.in_run_all())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// No step selected; show the listing instead of running anything
    Nothing,
    Run(Vec<Step>),
}

impl Plan {
    pub fn select(flags: &StepFlags) -> Self {
        let steps: Vec<Step> = Step::ALL
            .into_iter()
            .filter(|&s| flags.requested(s))
            .filter(|&s| !(flags.skip_repo_clone && s == Step::CloneRepos))
            .collect();

        if steps.is_empty() {
            Plan::Nothing
        } else {
            Plan::Run(steps)
        }
    }
}

/// Print every step with its flag, plus usage examples.
pub fn print_listing() {
    ui::header("Available Steps");
    println!();

    for step in Step::ALL {
        let flag = format!("--{}", step.name());
        if step.in_run_all() {
            println!("  {:<28} {}", flag.bold(), step.description().dimmed());
        } else {
            println!(
                "  {:<28} {} {}",
                flag.bold(),
                step.description().dimmed(),
                "(not in --all)".yellow()
            );
        }
    }

    println!();
    ui::section("Usage Examples");
    println!();
    println!("  {} Run every non-interactive step", "rigup --all".bold());
    println!(
        "  {} Everything except cloning",
        "rigup --all --skip-repo-clone".bold()
    );
    println!(
        "  {} Only some packages",
        "rigup --install-packages --packages git,fzf".bold()
    );
    println!(
        "  {} Clone and run startup scripts",
        "rigup --clone-repos --run-repo-startup".bold()
    );
}
