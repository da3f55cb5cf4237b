//! Command clipboard provider: pipe text into `wl-copy` or `xclip`.
//!
//! Spawns the clipboard program, writes the text to its stdin, closes
//! the pipe, and waits for exit. A non-zero exit or a missing program
//! is a clipboard failure.

use std::process::Stdio;

use futures::future::BoxFuture;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::resolver::{CapabilityError, ClipboardProvider};

/// Clipboard writer backed by an external program reading stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// `wl-copy` under Wayland, `xclip -selection clipboard` otherwise.
    pub fn detect() -> Self {
        if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self {
                program: "wl-copy".into(),
                args: Vec::new(),
            }
        } else {
            Self {
                program: "xclip".into(),
                args: vec!["-selection".into(), "clipboard".into()],
            }
        }
    }

    /// Use an explicit program and arguments. `argv` must be non-empty.
    pub fn from_argv(argv: &[String]) -> Self {
        let (program, args) = argv.split_first().map_or_else(
            || (String::new(), Vec::new()),
            |(p, rest)| (p.clone(), rest.to_vec()),
        );
        Self { program, args }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl ClipboardProvider for CommandClipboard {
    fn write<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), CapabilityError>> {
        Box::pin(async move {
            let mut child = Command::new(&self.program)
                .args(&self.args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .map_err(|e| {
                    CapabilityError::Clipboard(format!("failed to spawn {}: {e}", self.program))
                })?;

            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(text.as_bytes()).await.map_err(|e| {
                    CapabilityError::Clipboard(format!("failed to write to {}: {e}", self.program))
                })?;
                // Drop stdin to close the pipe so the program can finish.
            }

            let status = child.wait().await.map_err(|e| {
                CapabilityError::Clipboard(format!("failed to wait for {}: {e}", self.program))
            })?;

            if status.success() {
                Ok(())
            } else {
                Err(CapabilityError::Clipboard(format!(
                    "{} exited with status {status}",
                    self.program
                )))
            }
        })
    }
}
