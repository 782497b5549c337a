//! Scoped working-directory changes
//!
//! [`DirGuard::enter`] switches the process working directory and returns a
//! guard that switches back when dropped. Guards nest naturally: inner guards
//! drop first, so directories are restored in reverse order on success, early
//! return, `?` propagation and unwinding alike.

use std::io;
use std::path::{Path, PathBuf};

/// Restores the working directory it captured when dropped.
#[derive(Debug)]
#[must_use = "the previous directory is restored as soon as the guard is dropped"]
pub struct DirGuard {
    previous: PathBuf,
}

impl DirGuard {
    /// Change into `path`, remembering the current directory.
    ///
    /// On failure the working directory is left untouched.
    pub fn enter(path: &Path) -> io::Result<Self> {
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(path)?;
        log::debug!("Entered {} (from {})", path.display(), previous.display());
        Ok(Self { previous })
    }

    /// Pin the current directory without changing it.
    ///
    /// Wraps a whole run so that nothing inside it can leave the process
    /// somewhere else.
    pub fn hold() -> io::Result<Self> {
        Ok(Self {
            previous: std::env::current_dir()?,
        })
    }

    /// The directory that will be restored.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        match std::env::set_current_dir(&self.previous) {
            Ok(()) => log::debug!("Restored {}", self.previous.display()),
            Err(e) => log::error!(
                "Could not restore working directory {}: {e}",
                self.previous.display()
            ),
        }
    }
}

/// Run `f` inside `path`, restoring the working directory afterwards.
pub fn within<T, E>(path: &Path, f: impl FnOnce() -> Result<T, E>) -> Result<T, E>
where
    E: From<io::Error>,
{
    let _guard = DirGuard::enter(path)?;
    f()
}

/// Serializes tests that change the process working directory.
#[cfg(test)]
pub(crate) fn cwd_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, PoisonError};

    static CWD_LOCK: Mutex<()> = Mutex::new(());
    CWD_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cwd() -> PathBuf {
        std::env::current_dir().unwrap()
    }

    fn canonical_dirs(root: &TempDir, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|n| {
                let p = root.path().join(n);
                std::fs::create_dir_all(&p).unwrap();
                p.canonicalize().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_enter_restores_on_drop() {
        let _lock = cwd_lock();
        let root = TempDir::new().unwrap();
        let dirs = canonical_dirs(&root, &["a"]);
        let original = cwd();

        {
            let _guard = DirGuard::enter(&dirs[0]).unwrap();
            assert_eq!(cwd(), dirs[0]);
        }

        assert_eq!(cwd(), original);
    }

    #[test]
    fn test_nested_restore_in_reverse_order() {
        let _lock = cwd_lock();
        let root = TempDir::new().unwrap();
        let dirs = canonical_dirs(&root, &["a", "b", "c"]);
        let original = cwd();

        let g1 = DirGuard::enter(&dirs[0]).unwrap();
        let g2 = DirGuard::enter(&dirs[1]).unwrap();
        let g3 = DirGuard::enter(&dirs[2]).unwrap();
        assert_eq!(cwd(), dirs[2]);

        drop(g3);
        assert_eq!(cwd(), dirs[1]);
        drop(g2);
        assert_eq!(cwd(), dirs[0]);
        drop(g1);
        assert_eq!(cwd(), original);
    }

    #[test]
    fn test_restores_when_error_raised_mid_sequence() {
        let _lock = cwd_lock();
        let root = TempDir::new().unwrap();
        let dirs = canonical_dirs(&root, &["a", "b"]);
        let missing = root.path().join("missing");
        let original = cwd();

        let attempt = || -> io::Result<()> {
            let _a = DirGuard::enter(&dirs[0])?;
            let _b = DirGuard::enter(&dirs[1])?;
            let _c = DirGuard::enter(&missing)?;
            unreachable!("entering a missing directory must fail");
        };

        assert!(attempt().is_err());
        assert_eq!(cwd(), original);
    }

    #[test]
    fn test_restores_on_panic() {
        let _lock = cwd_lock();
        let root = TempDir::new().unwrap();
        let dirs = canonical_dirs(&root, &["a"]);
        let original = cwd();

        let result = std::panic::catch_unwind(|| {
            let _guard = DirGuard::enter(&dirs[0]).unwrap();
            panic!("boom");
        });

        assert!(result.is_err());
        assert_eq!(cwd(), original);
    }

    #[test]
    fn test_failed_enter_leaves_cwd() {
        let _lock = cwd_lock();
        let root = TempDir::new().unwrap();
        let original = cwd();

        assert!(DirGuard::enter(&root.path().join("nope")).is_err());
        assert_eq!(cwd(), original);
    }

    #[test]
    fn test_within_restores_after_error() {
        let _lock = cwd_lock();
        let root = TempDir::new().unwrap();
        let dirs = canonical_dirs(&root, &["a"]);
        let original = cwd();

        let result: anyhow::Result<()> = within(&dirs[0], || {
            assert_eq!(cwd(), dirs[0]);
            anyhow::bail!("pull failed")
        });

        assert!(result.is_err());
        assert_eq!(cwd(), original);
    }

    #[test]
    fn test_hold_restores_after_stray_change() {
        let _lock = cwd_lock();
        let root = TempDir::new().unwrap();
        let dirs = canonical_dirs(&root, &["a"]);
        let original = cwd();

        {
            let guard = DirGuard::hold().unwrap();
            assert_eq!(guard.previous(), original);
            std::env::set_current_dir(&dirs[0]).unwrap();
        }

        assert_eq!(cwd(), original);
    }
}
