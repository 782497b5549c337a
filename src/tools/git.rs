use anyhow::{Context, Result};
use std::path::Path;

use crate::runner;

/// Clone/pull primitives
pub trait Vcs {
    fn is_available(&self) -> bool;

    /// Clone `url` into `target`.
    fn clone_repo(&self, url: &str, target: &Path) -> Result<()>;

    /// Pull latest changes for the repository in the current directory.
    fn pull(&self) -> Result<()>;
}

/// The `git` binary
#[derive(Debug, Default)]
pub struct GitCli;

impl Vcs for GitCli {
    fn is_available(&self) -> bool {
        runner::run_quiet("git", &["--version"])
    }

    fn clone_repo(&self, url: &str, target: &Path) -> Result<()> {
        let lossy = target.to_string_lossy();
        let target: &str = &lossy;
        runner::run_checked("git", &["clone", url, target])
            .with_context(|| format!("git clone {url} failed"))
    }

    fn pull(&self) -> Result<()> {
        runner::run_checked("git", &["pull"]).context("git pull failed")
    }
}
