use thiserror::Error;

use crate::manifest::ManifestError;

/// Failures that abort a whole step (or one package-source batch of it).
///
/// Per-item failures never surface here; they are recorded as
/// [`Outcome::Failed`](crate::reconcile::Outcome::Failed).
#[derive(Debug, Error)]
pub enum StepError {
    #[error("{tool} is not available")]
    ToolNotAvailable { tool: String },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Backend(#[from] pkgkit::Error),

    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

impl StepError {
    pub fn tool_not_available(tool: &str) -> Self {
        Self::ToolNotAvailable {
            tool: tool.to_string(),
        }
    }
}
