//! Interactive selection through an external fuzzy filter.
//!
//! The filter reads candidate lines on stdin and prints the chosen one on
//! stdout. `fzf` is the supported filter; it draws its UI on the terminal, so
//! only stdin and stdout are piped.

use crate::core::error::GozelleError;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

pub const FINDER: &str = "fzf";

/// Exit codes the filter uses for "nothing chosen" (no match, Esc / Ctrl-C).
const CANCEL_CODES: [i32; 2] = [1, 130];

/// Searches the directories of `path_var` for an executable named `program`.
pub fn find_on_path(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    std::env::split_paths(path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Locates the fuzzy filter, failing with an actionable message when absent.
pub fn ensure_finder() -> Result<PathBuf, GozelleError> {
    let path_var = std::env::var_os("PATH");
    find_on_path(FINDER, path_var.as_deref()).ok_or_else(|| {
        GozelleError::MissingDependency(format!(
            "{FINDER} is not installed or not on PATH; install it to use interactive mode"
        ))
    })
}

/// Runs `program args..` with `candidates` on stdin.
///
/// Returns the selected line, or `None` when the user cancelled.
pub fn select(
    program: &Path,
    args: &[&str],
    candidates: &[String],
) -> Result<Option<String>, GozelleError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| GozelleError::io(program, e))?;

    if let Some(mut stdin) = child.stdin.take() {
        let mut input = candidates.join("\n");
        input.push('\n');
        match stdin.write_all(input.as_bytes()) {
            // The filter may exit before reading everything.
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
                return Err(GozelleError::io(program, e));
            }
            _ => {}
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| GozelleError::io(program, e))?;

    if !output.status.success() {
        if output.status.code().is_some_and(|c| CANCEL_CODES.contains(&c)) {
            debug!(status = %output.status, "selection cancelled");
            return Ok(None);
        }
        return Err(GozelleError::io(
            program,
            io::Error::other(format!("fuzzy filter exited with {}", output.status)),
        ));
    }

    let selection = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::trim_end)
        .unwrap_or_default()
        .to_string();
    Ok((!selection.is_empty()).then_some(selection))
}
