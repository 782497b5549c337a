use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

use crate::plan::StepFlags;

#[derive(Parser)]
#[command(name = "rigup")]
#[command(version)]
#[command(about = "Provision a developer workstation from a declarative manifest", long_about = None)]
pub struct Cli {
    /// Default directory repositories are cloned into [default: ~/source]
    #[arg(long, env = "RIGUP_CLONE_DIR", value_name = "DIR")]
    pub clone_directory: Option<String>,

    /// Manifest to read [default: <root>/manifest.json, then ~/.config/rigup/manifest.json]
    #[arg(long, env = "RIGUP_MANIFEST", value_name = "PATH")]
    pub manifest: Option<String>,

    /// Install scoop if it is missing
    #[arg(long)]
    pub install_scoop: bool,

    /// Add the scoop buckets declared packages come from
    #[arg(long)]
    pub add_buckets: bool,

    /// Install or update scoop and winget packages
    #[arg(long)]
    pub install_packages: bool,

    /// Install or update language servers via npm
    #[arg(long)]
    pub install_language_servers: bool,

    /// Clone missing repositories and pull existing ones
    #[arg(long)]
    pub clone_repos: bool,

    /// Open extension and manual-install pages in the browser
    #[arg(long)]
    pub launch_urls: bool,

    /// Prompt for user environment variables
    #[arg(long)]
    pub set_env_vars: bool,

    /// Run every non-interactive step
    #[arg(long)]
    pub all: bool,

    /// Leave repositories alone, even with --all
    #[arg(long)]
    pub skip_repo_clone: bool,

    /// Only reconcile these packages (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub packages: Option<Vec<String>>,

    /// Only reconcile these language servers (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub language_servers: Option<Vec<String>>,

    /// Run each repository's startup script after cloning or pulling
    #[arg(long)]
    pub run_repo_startup: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// List the available steps and exit
    #[arg(long)]
    pub list_steps: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn step_flags(&self) -> StepFlags {
        StepFlags {
            install_scoop: self.install_scoop,
            add_buckets: self.add_buckets,
            install_packages: self.install_packages,
            install_language_servers: self.install_language_servers,
            clone_repos: self.clone_repos,
            launch_urls: self.launch_urls,
            set_env_vars: self.set_env_vars,
            all: self.all,
            skip_repo_clone: self.skip_repo_clone,
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    pub fn manifest_path(&self) -> Option<PathBuf> {
        self.manifest.as_deref().map(crate::paths::expand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filters_split_on_commas() {
        let cli = Cli::try_parse_from([
            "rigup",
            "--install-packages",
            "--packages",
            "git,fzf",
            "--language-servers=pyright",
        ])
        .unwrap();

        assert_eq!(cli.packages, Some(vec!["git".to_string(), "fzf".to_string()]));
        assert_eq!(cli.language_servers, Some(vec!["pyright".to_string()]));
        assert!(cli.step_flags().install_packages);
    }

    #[test]
    fn test_log_level_from_flags() {
        let cli = Cli::try_parse_from(["rigup", "-vv"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);

        let cli = Cli::try_parse_from(["rigup", "-v", "-q"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Error);
    }

    #[test]
    fn test_all_and_skip_flags() {
        let cli = Cli::try_parse_from(["rigup", "--all", "--skip-repo-clone"]).unwrap();
        let flags = cli.step_flags();
        assert!(flags.all);
        assert!(flags.skip_repo_clone);
        assert!(!flags.launch_urls);
    }
}
