//! # pkgkit
//!
//! Narrow interfaces to the package managers a workstation provisioner drives.
//!
//! Each tool is modeled as a small trait with structured errors, so that the
//! reconciliation logic built on top of it can be tested against an in-memory
//! fake instead of the real binary:
//!
//! - [`Backend`] - install / update / query for system package managers
//!   ([`ScoopBackend`], [`WingetBackend`])
//! - [`NodeBackend`] - global and local npm packages ([`NpmBackend`])
//!
//! ## Example
//!
//! ```no_run
//! use pkgkit::{Backend, Package, ScoopBackend};
//!
//! let scoop = ScoopBackend::new();
//! let fzf = Package::new("fzf").with_bucket(Some("extras"));
//!
//! if scoop.is_installed(&fzf.name).unwrap_or(false) {
//!     scoop.update(&fzf.name).expect("update failed");
//! } else {
//!     scoop.install(&fzf).expect("install failed");
//! }
//! ```
//!
//! ## Testing
//!
//! [`MockBackend`] and [`MockNodeBackend`] record every mutating call, so tests
//! can assert on exactly which actions were issued:
//!
//! ```
//! use pkgkit::{Action, Backend, MockBackend, Package};
//!
//! let mock = MockBackend::new().with_installed(["git"]);
//! mock.update("git").unwrap();
//! mock.install(&Package::new("fzf")).unwrap();
//!
//! assert_eq!(
//!     mock.actions(),
//!     vec![Action::Update("git".into()), Action::Install("fzf".into())]
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use backend::mock::{Action, MockBackend, MockNodeBackend, NodeAction};
pub use backend::npm::NpmBackend;
pub use backend::scoop::ScoopBackend;
pub use backend::winget::WingetBackend;
pub use backend::{Backend, NodeBackend};
pub use error::{Error, ErrorCategory, Result};
pub use types::{DEFAULT_BUCKET, InstallScope, Package};
