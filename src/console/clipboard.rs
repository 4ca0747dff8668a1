//! Clipboard integration for the one-time password.
//!
//! Tries the native clipboard helpers first (Wayland/macOS), then the
//! legacy X11 tools as a fallback. Both failing surfaces as an error the
//! controller turns into a manual-copy instruction.

use crate::view::{Clipboard, CopyOutcome};
use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::process::{Command, Stdio};

const PRIMARY_COMMANDS: &[&[&str]] = &[&["wl-copy"], &["pbcopy"]];
const FALLBACK_COMMANDS: &[&[&str]] = &[
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];

fn pipe_to(command: &[&str], text: &str) -> Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| anyhow!("empty clipboard command"))?;
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))?;
    {
        // Drop the handle so the helper sees EOF before we wait on it.
        let mut stdin = child
            .stdin
            .take()
            .context("no stdin handle for clipboard helper")?;
        let _ = stdin.write_all(text.as_bytes());
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("{program} exited with {status}"))
    }
}

/// Clipboard backed by whichever helper binary the host provides.
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<CopyOutcome> {
        for command in PRIMARY_COMMANDS {
            if pipe_to(command, text).is_ok() {
                return Ok(CopyOutcome::Primary);
            }
        }
        for command in FALLBACK_COMMANDS {
            if pipe_to(command, text).is_ok() {
                tracing::debug!("clipboard copy used fallback helper");
                return Ok(CopyOutcome::Fallback);
            }
        }
        Err(anyhow!(
            "no clipboard helper available (tried wl-copy, pbcopy, xclip, xsel)"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piping_to_a_real_command_succeeds() {
        pipe_to(&["cat"], "hello").unwrap();
    }

    #[test]
    fn missing_helper_is_an_error() {
        assert!(pipe_to(&["definitely-not-a-clipboard-helper"], "hello").is_err());
    }

    #[test]
    fn failing_helper_is_an_error() {
        // `false` ignores stdin and exits non-zero.
        assert!(pipe_to(&["false"], "hello").is_err());
    }
}
