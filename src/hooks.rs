//! Convention-located scripts owned by the orchestrator
//!
//! ```text
//! <root>/packages/<package>.{ps1,sh,cmd}      post-install routine
//! <root>/repos/<repo>/bootstrap.{ps1,sh,cmd}  repository startup routine
//! ```
//!
//! The scripts live next to the orchestrator, not inside the cloned
//! repositories, so setup for every repository is defined in one place.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::dirscope::DirGuard;
use crate::runner;

/// Stem of the per-repository startup script
pub const REPO_BOOTSTRAP_STEM: &str = "bootstrap";

/// Extensions tried in order; the bare stem is tried last.
#[cfg(windows)]
const SCRIPT_EXTENSIONS: &[&str] = &["ps1", "cmd", "sh"];
#[cfg(not(windows))]
const SCRIPT_EXTENSIONS: &[&str] = &["sh", "ps1"];

#[derive(Debug, Clone)]
pub struct HookRunner {
    root: PathBuf,
}

impl HookRunner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn post_install_script(&self, package: &str) -> Option<PathBuf> {
        find_script(&self.root.join("packages"), package)
    }

    pub fn repo_startup_script(&self, repo_name: &str) -> Option<PathBuf> {
        find_script(&self.root.join("repos").join(repo_name), REPO_BOOTSTRAP_STEM)
    }

    /// Run the post-install routine for `package`, if one exists.
    ///
    /// Returns whether a script ran.
    pub fn run_post_install(&self, package: &str) -> Result<bool> {
        let Some(script) = self.post_install_script(package) else {
            return Ok(false);
        };

        log::info!("Running post-install script {}", script.display());
        runner::run_script(&script, &[])
            .with_context(|| format!("Post-install script for {package} failed"))?;
        Ok(true)
    }

    /// Run the startup routine for a repository inside its clone directory.
    ///
    /// Returns whether a script ran. Failures propagate to the caller.
    pub fn run_repo_startup(&self, repo_name: &str, clone_path: &Path) -> Result<bool> {
        let Some(script) = self.repo_startup_script(repo_name) else {
            log::debug!("No startup script for {repo_name}");
            return Ok(false);
        };

        // Relative paths would dangle once inside the clone directory
        let script = std::path::absolute(&script)
            .with_context(|| format!("Could not resolve {}", script.display()))?;
        let clone_path = std::path::absolute(clone_path)
            .with_context(|| format!("Could not resolve {}", clone_path.display()))?;
        let lossy = clone_path.to_string_lossy();
        let args = startup_args(&script, &lossy);

        log::info!("Running startup script {}", script.display());
        let _guard = DirGuard::enter(&clone_path)
            .with_context(|| format!("Could not enter {}", clone_path.display()))?;
        runner::run_script(&script, &args)
            .with_context(|| format!("Startup script for {repo_name} failed"))?;
        Ok(true)
    }
}

/// PowerShell scripts take the clone directory as `-CloneDirectory`, others
/// as their first positional argument.
fn startup_args<'a>(script: &Path, clone_dir: &'a str) -> Vec<&'a str> {
    let is_powershell = script
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("ps1"));
    if is_powershell {
        vec!["-CloneDirectory", clone_dir]
    } else {
        vec![clone_dir]
    }
}

fn find_script(dir: &Path, stem: &str) -> Option<PathBuf> {
    SCRIPT_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .chain(std::iter::once(dir.join(stem)))
        .find(|p| p.is_file())
}
