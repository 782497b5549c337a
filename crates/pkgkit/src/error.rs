//! Error types for package manager operations.
//!
//! Failures are categorized from the tool's own output so callers can decide
//! how to report them without matching on raw text.

use thiserror::Error;

/// Broad categories of package manager failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The tool binary itself is missing
    ToolNotFound,
    /// Package (or bucket) not found
    NotFound,
    /// Network-related failure
    Network,
    /// Permission denied
    Permission,
    /// Anything else
    Other,
}

impl ErrorCategory {
    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::ToolNotFound => "Install the tool or make sure it is on PATH",
            Self::NotFound => "Verify the package name or add the bucket/source that provides it",
            Self::Network => "Check your internet connection and try again",
            Self::Permission => "Check directory permissions or run from an elevated shell",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Errors that can occur while driving a package manager.
#[derive(Debug, Error)]
pub enum Error {
    /// The tool is not installed or not on PATH
    #[error("{tool} is not available on PATH")]
    ToolNotFound {
        /// Binary name, e.g. `scoop`
        tool: String,
    },

    /// Package not found in any configured source
    #[error("package not found: {name}")]
    NotFound {
        /// Name of the package that could not be found
        name: String,
    },

    /// Network-related error
    #[error("network error: {message}")]
    Network {
        /// Output of the failed command
        message: String,
    },

    /// Permission denied
    #[error("permission denied: {message}")]
    Permission {
        /// Output of the failed command
        message: String,
    },

    /// The backend has no such operation
    #[error("{tool} does not support {operation}")]
    Unsupported {
        /// Binary name
        tool: String,
        /// Operation that was requested
        operation: String,
    },

    /// Command ran but exited unsuccessfully
    #[error("{message}: {stderr}")]
    CommandFailed {
        /// What was being run
        message: String,
        /// Standard error (or output) of the command
        stderr: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::ToolNotFound { .. } => ErrorCategory::ToolNotFound,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Network { .. } => ErrorCategory::Network,
            Error::Permission { .. } => ErrorCategory::Permission,
            _ => ErrorCategory::Other,
        }
    }

    /// Map a spawn failure; a missing binary becomes [`Error::ToolNotFound`].
    pub fn from_spawn(tool: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::ToolNotFound {
                tool: tool.to_string(),
            }
        } else {
            Error::Io(err)
        }
    }

    /// Create an error from a failed command's output.
    pub fn from_output(tool: &str, output: &str, package_name: Option<&str>) -> Self {
        let lower = output.to_lowercase();

        if lower.contains("could not resolve")
            || lower.contains("connection refused")
            || lower.contains("timed out")
            || lower.contains("unable to connect")
            || lower.contains("network")
            || lower.contains("econnreset")
            || lower.contains("enotfound")
        {
            return Error::Network {
                message: output.trim().to_string(),
            };
        }

        if lower.contains("couldn't find manifest")
            || lower.contains("no package found")
            || lower.contains("not found")
            || lower.contains("e404")
        {
            return Error::NotFound {
                name: package_name.unwrap_or("unknown").to_string(),
            };
        }

        if lower.contains("access is denied")
            || lower.contains("permission denied")
            || lower.contains("eacces")
            || lower.contains("administrator")
        {
            return Error::Permission {
                message: output.trim().to_string(),
            };
        }

        Error::CommandFailed {
            message: format!(
                "{tool} command failed{}",
                package_name
                    .map(|n| format!(" for {n}"))
                    .unwrap_or_default()
            ),
            stderr: output.trim().to_string(),
        }
    }
}

/// Result type for package manager operations.
pub type Result<T> = std::result::Result<T, Error>;
