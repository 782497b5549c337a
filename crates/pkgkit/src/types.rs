//! Core types shared by every backend.

use std::fmt;

/// The bucket scoop resolves unqualified names against.
pub const DEFAULT_BUCKET: &str = "main";

/// A package as declared by the user.
///
/// `name` is the key used to look the package up in the local install state;
/// `bucket` (scoop bucket, winget source) only matters when installing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Package name, e.g. `git` or `Microsoft.PowerToys`
    pub name: String,
    /// Optional non-default source the package lives in
    pub bucket: Option<String>,
}

impl Package {
    /// Create a package resolved against the default source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bucket: None,
        }
    }

    /// Attach a source. Blank values are treated as absent.
    pub fn with_bucket(mut self, bucket: Option<&str>) -> Self {
        self.bucket = bucket
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(ToString::to_string);
        self
    }

    /// The bucket, if it is something other than [`DEFAULT_BUCKET`].
    pub fn custom_bucket(&self) -> Option<&str> {
        self.bucket
            .as_deref()
            .filter(|b| !b.eq_ignore_ascii_case(DEFAULT_BUCKET))
    }

    /// Fully-qualified installable identifier: `bucket/name`, or just `name`
    /// when the bucket is the default one.
    pub fn qualified_name(&self) -> String {
        match self.custom_bucket() {
            Some(bucket) => format!("{bucket}/{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

/// Where an npm package is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallScope {
    /// `npm install -g`
    Global,
    /// Installed into the current directory
    Local,
}

impl InstallScope {
    /// Scope from an optional `global` flag; absent means global.
    pub fn from_global_flag(global: Option<bool>) -> Self {
        if global.unwrap_or(true) {
            Self::Global
        } else {
            Self::Local
        }
    }
}

impl fmt::Display for InstallScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Local => write!(f, "local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_default_bucket() {
        assert_eq!(Package::new("git").qualified_name(), "git");
        assert_eq!(
            Package::new("git").with_bucket(Some("main")).qualified_name(),
            "git"
        );
    }

    #[test]
    fn test_qualified_name_custom_bucket() {
        let pkg = Package::new("vscode").with_bucket(Some("extras"));
        assert_eq!(pkg.qualified_name(), "extras/vscode");
        assert_eq!(pkg.to_string(), "extras/vscode");
    }

    #[test]
    fn test_blank_bucket_is_absent() {
        let pkg = Package::new("fzf").with_bucket(Some("  "));
        assert_eq!(pkg.bucket, None);
        assert_eq!(pkg.qualified_name(), "fzf");
    }

    #[test]
    fn test_scope_from_global_flag() {
        assert_eq!(InstallScope::from_global_flag(None), InstallScope::Global);
        assert_eq!(
            InstallScope::from_global_flag(Some(true)),
            InstallScope::Global
        );
        assert_eq!(
            InstallScope::from_global_flag(Some(false)),
            InstallScope::Local
        );
    }
}
