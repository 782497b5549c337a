mod cli;
mod dirscope;
mod error;
mod hooks;
mod manifest;
mod paths;
mod plan;
mod provisioner;
mod reconcile;
mod runner;
mod tools;
mod ui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::Cli;
use std::io;

use hooks::HookRunner;
use manifest::ManifestStore;
use plan::Plan;
use provisioner::{Provisioner, Settings, Toolset};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .init();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "rigup", &mut io::stdout());
        return Ok(());
    }

    if cli.list_steps {
        plan::print_listing();
        return Ok(());
    }

    let steps = match Plan::select(&cli.step_flags()) {
        Plan::Run(steps) => steps,
        Plan::Nothing => {
            ui::warn("Nothing to do: no step was selected");
            println!();
            plan::print_listing();
            return Ok(());
        }
    };

    if !cli.quiet {
        ui::banner();
    }

    let root = paths::orchestrator_root()?;
    let manifest_path = match cli.manifest_path() {
        Some(path) => path,
        None => paths::default_manifest()?,
    };
    let clone_dir = match cli.clone_directory.as_deref() {
        Some(dir) => paths::expand(dir),
        None => paths::default_clone_dir()?,
    };
    let clone_dir = std::path::absolute(&clone_dir)
        .with_context(|| format!("Could not resolve {}", clone_dir.display()))?;

    let manifest = ManifestStore::new(manifest_path);
    let hooks = HookRunner::new(root);
    ui::kv("Manifest", &manifest.path().display().to_string());
    ui::kv("Clone directory", &clone_dir.display().to_string());
    ui::kv("Hook scripts", &hooks.root().display().to_string());

    let settings = Settings {
        clone_dir,
        run_repo_startup: cli.run_repo_startup,
        package_filter: cli.packages,
        language_server_filter: cli.language_servers,
        assume_yes: cli.yes,
    };
    let provisioner = Provisioner::new(
        settings,
        manifest,
        hooks,
        Toolset::system()?,
    );

    let summary = provisioner.run(&steps)?;
    if !summary.is_success() {
        anyhow::bail!("{} item(s) or step(s) failed", summary.failed());
    }

    Ok(())
}
