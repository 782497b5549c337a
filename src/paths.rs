//! Centralized path resolution for rigup
//!
//! # Environment Variables
//!
//! - `RIGUP_HOME` - Override the orchestrator root (where `packages/` and
//!   `repos/` hook scripts live). Defaults to the directory holding the binary.
//! - `RIGUP_CONFIG_DIR` - Override config directory
//! - `RIGUP_STATE_DIR` - Override state directory
//!
//! # Manifest Resolution Priority
//!
//! 1. `--manifest` / `RIGUP_MANIFEST`
//! 2. `<root>/manifest.json` if it exists
//! 3. `<config_dir>/manifest.json`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for the orchestrator root override
pub const ENV_HOME: &str = "RIGUP_HOME";

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "RIGUP_CONFIG_DIR";

/// Environment variable for state directory override
pub const ENV_STATE_DIR: &str = "RIGUP_STATE_DIR";

/// File name of the declaration manifest
pub const MANIFEST_FILE: &str = "manifest.json";

/// Directory holding the orchestrator's own hook scripts.
///
/// Priority:
/// 1. `RIGUP_HOME` env var
/// 2. Directory of the running executable
pub fn orchestrator_root() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_HOME) {
        // Hooks run from inside clone directories, so a relative root would dangle
        let path = std::path::absolute(expand(&dir))
            .with_context(|| format!("Could not resolve {ENV_HOME}={dir}"))?;
        log::debug!("Using orchestrator root from {}: {}", ENV_HOME, path.display());
        return Ok(path);
    }

    let exe = std::env::current_exe().context("Could not determine executable path")?;
    let root = exe
        .parent()
        .map(Path::to_path_buf)
        .context("Executable has no parent directory")?;
    log::debug!("Using orchestrator root next to binary: {}", root.display());
    Ok(root)
}

/// Get the rigup config directory path
///
/// Priority:
/// 1. `RIGUP_CONFIG_DIR` env var
/// 2. `XDG_CONFIG_HOME/rigup`
/// 3. Platform default:
///    - Windows: `%APPDATA%\rigup`
///    - macOS/Linux: `~/.config/rigup`
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        return Ok(expand(&dir));
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("rigup"));
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            return Ok(app_data.join("rigup"));
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("rigup"))
}

/// Get the rigup state directory path
///
/// Priority:
/// 1. `RIGUP_STATE_DIR` env var
/// 2. `XDG_STATE_HOME/rigup`
/// 3. `~/.local/state/rigup` (`%LOCALAPPDATA%\rigup` on Windows)
pub fn state_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_STATE_DIR) {
        return Ok(expand(&dir));
    }

    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg_state).join("rigup"));
    }

    #[cfg(windows)]
    {
        if let Some(local_app_data) = dirs::data_local_dir() {
            return Ok(local_app_data.join("rigup"));
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".local").join("state").join("rigup"))
}

/// Resolve the manifest path when none was given on the command line.
pub fn default_manifest() -> Result<PathBuf> {
    let beside_binary = orchestrator_root()?.join(MANIFEST_FILE);
    if beside_binary.exists() {
        return Ok(beside_binary);
    }
    Ok(config_dir()?.join(MANIFEST_FILE))
}

/// Default root that repositories are cloned under: `~/source`
pub fn default_clone_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join("source"))
}

/// Expand `~`, `$VAR`/`${VAR}` and Windows-style `%VAR%` references.
///
/// Substituted values are inserted verbatim and never expanded again.
/// Unknown variables are left as-is.
pub fn expand(path: &str) -> PathBuf {
    let unified = percent_to_braces(path);
    let home = || dirs::home_dir().map(|h| h.to_string_lossy().into_owned());
    let lookup = |name: &str| std::env::var(name).ok();
    let expanded = shellexpand::full_with_context_no_errors(&unified, home, lookup);
    PathBuf::from(expanded.into_owned())
}

/// Expand a declared path and make it absolute against `base` if relative.
pub fn resolve(path: &str, base: &Path) -> PathBuf {
    let expanded = expand(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// Rewrite each `%NAME%` whose variable is set as `${NAME}`, so a single
/// shellexpand pass resolves both syntaxes. Unset ones stay literal.
fn percent_to_braces(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                if std::env::var_os(name).is_some() && !name.contains(['{', '}', '$']) {
                    out.push_str("${");
                    out.push_str(name);
                    out.push('}');
                } else {
                    out.push('%');
                    out.push_str(name);
                    out.push('%');
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

// ============================================================================
// Tests
// ============================================================================
