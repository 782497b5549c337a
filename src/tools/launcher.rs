use anyhow::Result;

use crate::runner;

/// Opens URLs in the user's browser
pub trait UrlLauncher {
    fn open(&self, url: &str) -> Result<()>;
}

/// Platform opener: `start` on Windows, `open` on macOS, `xdg-open` elsewhere
#[derive(Debug, Default)]
pub struct SystemLauncher;

impl UrlLauncher for SystemLauncher {
    fn open(&self, url: &str) -> Result<()> {
        if cfg!(windows) {
            // The empty string is the window title `start` expects first
            runner::run_checked("cmd", &["/C", "start", "", url])
        } else if cfg!(target_os = "macos") {
            runner::run_checked("open", &[url])
        } else {
            runner::run_checked("xdg-open", &[url])
        }
    }
}
