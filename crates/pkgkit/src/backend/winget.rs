//! winget CLI backend.

use crate::backend::{Backend, run_tool, run_tool_checked};
use crate::error::{Error, Result};
use crate::types::Package;

const TOOL: &str = "winget";

const AGREEMENTS: [&str; 2] = ["--accept-package-agreements", "--accept-source-agreements"];

/// Backend that executes real `winget` commands.
#[derive(Debug, Default, Clone)]
pub struct WingetBackend;

impl WingetBackend {
    /// Create a new WingetBackend.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for WingetBackend {
    fn tool(&self) -> &'static str {
        TOOL
    }

    fn is_available(&self) -> bool {
        run_tool(TOOL, &["--version"]).is_ok_and(|o| o.status.success())
    }

    fn is_installed(&self, name: &str) -> Result<bool> {
        // Exits non-zero when nothing matches
        let output = run_tool(
            TOOL,
            &[
                "list",
                "--id",
                name,
                "--exact",
                "--accept-source-agreements",
            ],
        )?;
        Ok(output.status.success())
    }

    fn install(&self, package: &Package) -> Result<()> {
        let mut args = vec!["install", "--id", package.name.as_str(), "--exact", "--silent"];
        if let Some(source) = package.bucket.as_deref() {
            args.extend(["--source", source]);
        }
        args.extend(AGREEMENTS);
        run_tool_checked(TOOL, &args, Some(&package.name))?;
        Ok(())
    }

    fn update(&self, name: &str) -> Result<()> {
        let mut args = vec!["upgrade", "--id", name, "--exact", "--silent"];
        args.extend(AGREEMENTS);
        match run_tool_checked(TOOL, &args, Some(name)) {
            Ok(_) => Ok(()),
            Err(Error::CommandFailed { stderr, .. }) if is_up_to_date(&stderr) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// winget exits non-zero when there is simply nothing to upgrade.
fn is_up_to_date(output: &str) -> bool {
    let lower = output.to_lowercase();
    lower.contains("no applicable upgrade") || lower.contains("no available upgrade")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_up_to_date() {
        assert!(is_up_to_date("No applicable upgrade found."));
        assert!(is_up_to_date("No available upgrade found.\r\n"));
        assert!(!is_up_to_date("Installer hash does not match"));
    }
}
