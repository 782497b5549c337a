//! Scoop CLI backend.

use crate::backend::{Backend, run_tool, run_tool_checked};
use crate::error::Result;
use crate::types::Package;

const TOOL: &str = "scoop";

/// Backend that executes real `scoop` commands.
#[derive(Debug, Default, Clone)]
pub struct ScoopBackend;

impl ScoopBackend {
    /// Create a new ScoopBackend.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for ScoopBackend {
    fn tool(&self) -> &'static str {
        TOOL
    }

    fn is_available(&self) -> bool {
        run_tool(TOOL, &["--version"]).is_ok_and(|o| o.status.success())
    }

    fn is_installed(&self, name: &str) -> Result<bool> {
        // `scoop prefix` fails for apps that are not installed
        let output = run_tool(TOOL, &["prefix", name])?;
        Ok(output.status.success())
    }

    fn install(&self, package: &Package) -> Result<()> {
        let id = package.qualified_name();
        run_tool_checked(TOOL, &["install", &id], Some(&package.name))?;
        Ok(())
    }

    fn update(&self, name: &str) -> Result<()> {
        run_tool_checked(TOOL, &["update", name], Some(name))?;
        Ok(())
    }

    fn list_buckets(&self) -> Result<Vec<String>> {
        let stdout = run_tool_checked(TOOL, &["bucket", "list"], None)?;
        Ok(parse_bucket_list(&stdout))
    }

    fn add_bucket(&self, bucket: &str) -> Result<()> {
        run_tool_checked(TOOL, &["bucket", "add", bucket], Some(bucket))?;
        Ok(())
    }
}

/// Parse the table printed by `scoop bucket list`.
///
/// ```text
/// Name    Source                                  Updated   Manifests
/// ----    ------                                  -------   ---------
/// main    https://github.com/ScoopInstaller/Main  ...       1234
/// ```
fn parse_bucket_list(stdout: &str) -> Vec<String> {
    let mut in_rows = false;
    let mut buckets = Vec::new();

    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("----") {
            in_rows = true;
            continue;
        }
        if in_rows && let Some(name) = line.split_whitespace().next() {
            buckets.push(name.to_string());
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_list() {
        let out = "\nName   Source                                    Updated            Manifests\n\
                   ----   ------                                    -------            ---------\n\
                   main   https://github.com/ScoopInstaller/Main    8/1/2025 10:00:00  1402\n\
                   extras https://github.com/ScoopInstaller/Extras  8/1/2025 10:00:00  2101\n\n";
        assert_eq!(parse_bucket_list(out), vec!["main", "extras"]);
    }

    #[test]
    fn test_parse_bucket_list_empty() {
        assert!(parse_bucket_list("").is_empty());
        assert!(parse_bucket_list("WARN  No bucket found.").is_empty());
    }
}
