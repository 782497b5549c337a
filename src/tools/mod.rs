//! Narrow interfaces to the collaborators that are not package managers
//!
//! Version control, the user environment store, interactive prompts and the
//! URL opener each sit behind a small trait so the reconcilers can be driven
//! by fakes in tests.

pub mod env;
pub mod git;
pub mod launcher;
pub mod prompt;

#[cfg(test)]
pub mod fake;

pub use env::EnvStore;
pub use git::{GitCli, Vcs};
pub use launcher::{SystemLauncher, UrlLauncher};
pub use prompt::{DialoguerPrompter, Prompter};
