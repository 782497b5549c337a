//! Declaration store: the typed manifest of desired workstation state
//!
//! The manifest is read from disk at most once per [`ManifestStore`]; every
//! step that needs it borrows the memoized value. A missing or malformed file
//! is reported to the step that asked for it, which then aborts on its own
//! while independent steps carry on.

use serde::Deserialize;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Schema
// ============================================================================

/// Root declaration object
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub scoop_packages: Vec<PackageSpec>,

    #[serde(default)]
    pub winget_packages: Vec<PackageSpec>,

    /// Language servers and other npm tooling
    #[serde(default)]
    pub npm_packages: Vec<LanguageServerSpec>,

    #[serde(default)]
    pub repositories: Vec<RepositorySpec>,

    /// Names of environment variables whose values are prompted for
    #[serde(default)]
    pub manual_env_var: Vec<String>,

    #[serde(default)]
    pub edge_extensions: Vec<UrlSpec>,

    #[serde(default)]
    pub manual_installs: Vec<UrlSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PackageSpec {
    pub name: String,
    #[serde(default, alias = "source")]
    pub bucket: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PackageSpec {
    pub fn to_package(&self) -> pkgkit::Package {
        pkgkit::Package::new(&self.name).with_bucket(self.bucket.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LanguageServerSpec {
    pub name: String,
    /// Install globally (`npm -g`); defaults to true
    #[serde(default)]
    pub global: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LanguageServerSpec {
    pub fn scope(&self) -> pkgkit::InstallScope {
        pkgkit::InstallScope::from_global_flag(self.global)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RepositorySpec {
    pub url: String,
    /// Parent directory to clone into; may reference environment variables
    #[serde(default)]
    pub destination: Option<String>,
    /// Clone straight into `destination` instead of `destination/<repo>`
    #[serde(default)]
    pub not_create_child_dir: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl RepositorySpec {
    /// Repository name from the last URL segment, minus a trailing `.git`.
    ///
    /// `https://x/y/myrepo.git` → `myrepo`
    pub fn repo_name(&self) -> String {
        let url = self.url.trim().trim_end_matches(['/', '\\']);
        let url = url.strip_suffix(".git").unwrap_or(url);
        url.rsplit(['/', '\\', ':'])
            .next()
            .unwrap_or(url)
            .to_string()
    }
}

/// A page to open in the browser (extension store entry, manual download)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UrlSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
}

impl UrlSpec {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

impl Manifest {
    /// Parse a manifest, choosing the format from the file extension.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let manifest: Self = if is_toml {
            toml::from_str(content).map_err(|e| ManifestError::malformed(path, e))?
        } else {
            serde_json::from_str(content).map_err(|e| ManifestError::malformed(path, e))?
        };

        manifest.validate().map_err(|msg| ManifestError::malformed(path, msg))?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), String> {
        for (list, specs) in [
            ("scoopPackages", &self.scoop_packages),
            ("wingetPackages", &self.winget_packages),
        ] {
            if let Some(i) = specs.iter().position(|p| p.name.trim().is_empty()) {
                return Err(format!("{list}[{i}]: name must not be empty"));
            }
        }
        if let Some(i) = self.npm_packages.iter().position(|p| p.name.trim().is_empty()) {
            return Err(format!("npmPackages[{i}]: name must not be empty"));
        }
        if let Some(i) = self.repositories.iter().position(|r| r.url.trim().is_empty()) {
            return Err(format!("repositories[{i}]: url must not be empty"));
        }
        if let Some(i) = self.manual_env_var.iter().position(|v| v.trim().is_empty()) {
            return Err(format!("manualEnvVar[{i}]: name must not be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Store
// ============================================================================

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("manifest {} is malformed: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("could not read manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    fn malformed(path: &Path, message: impl ToString) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Loads the manifest on first use and hands out the memoized value after.
#[derive(Debug)]
pub struct ManifestStore {
    path: PathBuf,
    loaded: OnceCell<Manifest>,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: OnceCell::new(),
        }
    }

    /// A store that is already loaded, for callers that build manifests in code.
    pub fn preloaded(manifest: Manifest) -> Self {
        let loaded = OnceCell::new();
        let _ = loaded.set(manifest);
        Self {
            path: PathBuf::new(),
            loaded,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the manifest once; later calls return the cached value.
    ///
    /// Failures are not cached, so each dependent step reports them.
    pub fn load(&self) -> Result<&Manifest, ManifestError> {
        if let Some(manifest) = self.loaded.get() {
            return Ok(manifest);
        }

        let manifest = self.read()?;
        Ok(self.loaded.get_or_init(|| manifest))
    }

    fn read(&self) -> Result<Manifest, ManifestError> {
        log::debug!("Loading manifest from {}", self.path.display());

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ManifestError::Missing(self.path.clone()));
            }
            Err(source) => {
                return Err(ManifestError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let manifest = Manifest::parse(&content, &self.path)?;
        log::info!(
            "Loaded manifest: {} scoop, {} winget, {} npm, {} repos, {} env vars",
            manifest.scoop_packages.len(),
            manifest.winget_packages.len(),
            manifest.npm_packages.len(),
            manifest.repositories.len(),
            manifest.manual_env_var.len()
        );
        Ok(manifest)
    }
}

// ============================================================================
// Tests
// ============================================================================
