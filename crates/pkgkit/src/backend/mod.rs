//! Backend abstractions for package managers.
//!
//! The [`Backend`] trait covers system package managers (scoop, winget); the
//! [`NodeBackend`] trait covers npm, whose global/local split does not fit the
//! former. Both are intentionally narrow: query, install, update.

pub mod mock;
pub mod npm;
pub mod scoop;
pub mod winget;

use crate::error::{Error, Result};
use crate::types::{InstallScope, Package};
use std::process::{Command, Output};

/// Backend trait for system package managers.
pub trait Backend: Send + Sync {
    /// Binary name, used in messages.
    fn tool(&self) -> &'static str;

    /// Check if the tool is callable.
    fn is_available(&self) -> bool;

    /// Check if a package is installed, by bare name.
    fn is_installed(&self, name: &str) -> Result<bool>;

    /// Install a package using its fully-qualified identifier.
    fn install(&self, package: &Package) -> Result<()>;

    /// Update an installed package, by bare name.
    fn update(&self, name: &str) -> Result<()>;

    /// List known buckets/sources.
    fn list_buckets(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Register a bucket/source.
    fn add_bucket(&self, _bucket: &str) -> Result<()> {
        Err(Error::Unsupported {
            tool: self.tool().to_string(),
            operation: "adding buckets".to_string(),
        })
    }
}

/// Backend trait for npm-style language tooling.
pub trait NodeBackend: Send + Sync {
    /// Check if npm is callable.
    fn is_available(&self) -> bool;

    /// Names of globally installed packages.
    fn list_global(&self) -> Result<Vec<String>>;

    /// Install a package in the given scope.
    fn install(&self, name: &str, scope: InstallScope) -> Result<()>;

    /// Update a package in the given scope.
    fn update(&self, name: &str, scope: InstallScope) -> Result<()>;
}

/// Build a command for a tool that may be a `.cmd`/`.ps1` shim on Windows.
pub(crate) fn tool_command(tool: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", tool]);
        cmd
    } else {
        Command::new(tool)
    }
}

/// Run a tool and return its raw output.
pub(crate) fn run_tool(tool: &str, args: &[&str]) -> Result<Output> {
    log::debug!("Running: {} {}", tool, args.join(" "));
    tool_command(tool)
        .args(args)
        .output()
        .map_err(|e| Error::from_spawn(tool, e))
}

/// Run a tool and check for success, returning stdout.
pub(crate) fn run_tool_checked(tool: &str, args: &[&str], package: Option<&str>) -> Result<String> {
    let output = run_tool(tool, args)?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // scoop and winget report most failures on stdout
        let text = if stderr.trim().is_empty() {
            stdout.as_str()
        } else {
            stderr.as_ref()
        };
        return Err(Error::from_output(tool, text, package));
    }

    Ok(stdout)
}
