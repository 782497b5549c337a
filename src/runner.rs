use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Run a command and inherit stdio (shows output in real-time)
pub fn run(cmd: &str, args: &[&str]) -> Result<ExitStatus> {
    log::debug!("Running: {} {}", cmd, args.join(" "));
    Command::new(cmd)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to execute: {} {}", cmd, args.join(" ")))
}

/// Run a command, failing unless it exits successfully
pub fn run_checked(cmd: &str, args: &[&str]) -> Result<()> {
    let status = run(cmd, args)?;
    if !status.success() {
        anyhow::bail!("{} {} exited with {}", cmd, args.join(" "), status);
    }
    Ok(())
}

/// Run a command silently, returning success/failure
pub fn run_quiet(cmd: &str, args: &[&str]) -> bool {
    log::debug!("Running quietly: {} {}", cmd, args.join(" "));
    let ok = Command::new(cmd)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success());
    log::trace!("{cmd} succeeded: {ok}");
    ok
}

/// Check if a command exists
pub fn command_exists(cmd: &str) -> bool {
    let finder = if cfg!(windows) { "where" } else { "which" };
    let found = run_quiet(finder, &[cmd]);
    log::debug!("{cmd} on PATH: {found}");
    found
}

/// Run a script, picking the interpreter from its extension
pub fn run_script(script: &Path, args: &[&str]) -> Result<()> {
    let lossy = script.to_string_lossy();
    let path: &str = &lossy;
    let ext = script
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("ps1") => {
            let shell = if command_exists("pwsh") {
                "pwsh"
            } else {
                "powershell"
            };
            let mut full = vec!["-NoProfile", "-ExecutionPolicy", "Bypass", "-File", path];
            full.extend_from_slice(args);
            run_checked(shell, &full)
        }
        Some("sh") => {
            let mut full = vec![path];
            full.extend_from_slice(args);
            run_checked("sh", &full)
        }
        Some("cmd" | "bat") => {
            let mut full = vec!["/C", path];
            full.extend_from_slice(args);
            run_checked("cmd", &full)
        }
        _ => run_checked(path, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_run_quiet_reports_exit_status() {
        assert!(run_quiet("sh", &["-c", "exit 0"]));
        assert!(!run_quiet("sh", &["-c", "echo noise >&2; exit 1"]));
    }

    #[test]
    fn test_run_quiet_missing_program_is_false() {
        assert!(!run_quiet("rigup-no-such-program-4242", &[]));
    }

    #[test]
    fn test_command_exists_for_missing_program() {
        assert!(!command_exists("rigup-no-such-program-4242"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_checked_fails_on_nonzero_exit() {
        assert!(run_checked("sh", &["-c", "exit 0"]).is_ok());
        let err = run_checked("sh", &["-c", "exit 7"]).unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }
}
