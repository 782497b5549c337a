//! npm CLI backend.

use crate::backend::{NodeBackend, run_tool, run_tool_checked};
use crate::error::Result;
use crate::types::InstallScope;
use serde::Deserialize;
use std::collections::BTreeMap;

const TOOL: &str = "npm";

/// Backend that executes real `npm` commands.
#[derive(Debug, Default, Clone)]
pub struct NpmBackend;

#[derive(Deserialize)]
struct NpmList {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
}

impl NpmBackend {
    /// Create a new NpmBackend.
    pub fn new() -> Self {
        Self
    }
}

fn scoped_args<'a>(verb: &'a str, name: &'a str, scope: InstallScope) -> Vec<&'a str> {
    match scope {
        InstallScope::Global => vec![verb, "-g", name],
        InstallScope::Local => vec![verb, name],
    }
}

impl NodeBackend for NpmBackend {
    fn is_available(&self) -> bool {
        run_tool(TOOL, &["--version"]).is_ok_and(|o| o.status.success())
    }

    fn list_global(&self) -> Result<Vec<String>> {
        // `npm list` exits non-zero on peer dependency problems but still prints the tree
        let output = run_tool(TOOL, &["list", "-g", "--depth=0", "--json"])?;
        parse_npm_list(&output.stdout)
    }

    fn install(&self, name: &str, scope: InstallScope) -> Result<()> {
        run_tool_checked(TOOL, &scoped_args("install", name, scope), Some(name))?;
        Ok(())
    }

    fn update(&self, name: &str, scope: InstallScope) -> Result<()> {
        run_tool_checked(TOOL, &scoped_args("update", name, scope), Some(name))?;
        Ok(())
    }
}

fn parse_npm_list(stdout: &[u8]) -> Result<Vec<String>> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let list: NpmList = serde_json::from_slice(stdout)?;
    Ok(list.dependencies.into_keys().collect())
}
