//! User-scope environment variables
//!
//! On Windows values go through `setx`, which persists them for new shells.
//! Elsewhere they are written as `export` lines to a profile fragment under
//! the state directory that the user's shell rc sources.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::runner;

/// The OS environment-variable store
pub trait EnvStore {
    /// Current value, if any.
    fn get(&self, name: &str) -> Option<String>;

    /// Persist a value at user scope.
    fn set_user(&self, name: &str, value: &str) -> Result<()>;
}

/// Windows user environment via `setx`
#[derive(Debug, Default)]
pub struct SetxEnvStore;

impl EnvStore for SetxEnvStore {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set_user(&self, name: &str, value: &str) -> Result<()> {
        let output = std::process::Command::new("setx")
            .args([name, value])
            .output()
            .context("Failed to execute setx")?;
        if !output.status.success() {
            anyhow::bail!(
                "setx {name} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

/// `export NAME='value'` lines in a sourced profile fragment
#[derive(Debug)]
pub struct ProfileEnvStore {
    path: PathBuf,
}

impl ProfileEnvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().map(ToString::to_string).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e).with_context(|| format!("Could not read {}", self.path.display())),
        }
    }

    fn stored(&self, name: &str) -> Option<String> {
        let prefix = export_prefix(name);
        self.read_lines()
            .ok()?
            .iter()
            .find_map(|l| l.strip_prefix(&prefix).map(unquote))
    }
}

impl EnvStore for ProfileEnvStore {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().or_else(|| self.stored(name))
    }

    fn set_user(&self, name: &str, value: &str) -> Result<()> {
        if !is_valid_name(name) {
            anyhow::bail!("'{name}' is not a valid environment variable name");
        }

        let prefix = export_prefix(name);
        let line = format!("{prefix}{}", quote(value));

        let mut lines = self.read_lines()?;
        match lines.iter_mut().find(|l| l.starts_with(&prefix)) {
            Some(existing) => *existing = line,
            None => lines.push(line),
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&self.path, content)
            .with_context(|| format!("Could not write {}", self.path.display()))?;

        log::debug!("Wrote {name} to {}", self.path.display());
        Ok(())
    }
}

/// The store for this platform.
pub fn default_store() -> Result<Box<dyn EnvStore>> {
    if cfg!(windows) && runner::command_exists("setx") {
        return Ok(Box::new(SetxEnvStore));
    }
    Ok(Box::new(ProfileEnvStore::new(
        crate::paths::state_dir()?.join("env.sh"),
    )))
}

fn export_prefix(name: &str) -> String {
    format!("export {name}=")
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn unquote(raw: &str) -> String {
    raw.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .map(|s| s.replace(r"'\''", "'"))
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let store = ProfileEnvStore::new(dir.path().join("state").join("env.sh"));

        store.set_user("RIGUP_TEST_PROFILE_A", "hello world").unwrap();
        assert_eq!(
            store.get("RIGUP_TEST_PROFILE_A").as_deref(),
            Some("hello world")
        );
    }

    #[test]
    fn test_set_replaces_existing_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("env.sh");
        let store = ProfileEnvStore::new(&path);

        store.set_user("RIGUP_TEST_PROFILE_B", "one").unwrap();
        store.set_user("RIGUP_TEST_PROFILE_C", "keep").unwrap();
        store.set_user("RIGUP_TEST_PROFILE_B", "two").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "export RIGUP_TEST_PROFILE_B='two'\nexport RIGUP_TEST_PROFILE_C='keep'\n"
        );
    }

    #[test]
    fn test_quotes_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ProfileEnvStore::new(dir.path().join("env.sh"));

        store.set_user("RIGUP_TEST_PROFILE_D", "it's $HOME").unwrap();
        assert_eq!(
            store.get("RIGUP_TEST_PROFILE_D").as_deref(),
            Some("it's $HOME")
        );
    }

    #[test]
    fn test_invalid_name_rejected() {
        let dir = TempDir::new().unwrap();
        let store = ProfileEnvStore::new(dir.path().join("env.sh"));
        assert!(store.set_user("1BAD", "x").is_err());
        assert!(store.set_user("BAD-NAME", "x").is_err());
        assert!(!dir.path().join("env.sh").exists());
    }

    #[test]
    fn test_get_missing() {
        let dir = TempDir::new().unwrap();
        let store = ProfileEnvStore::new(dir.path().join("env.sh"));
        assert_eq!(store.get("RIGUP_TEST_PROFILE_NEVER_SET"), None);
    }
}
