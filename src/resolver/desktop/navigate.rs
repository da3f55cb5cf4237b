//! Command opener: launch `xdg-open` (or `open` on macOS) on a URL.

use std::process::Stdio;

use tokio::process::Command;

use crate::resolver::{CapabilityError, NavigationProvider};

pub struct CommandOpener {
    program: String,
}

impl CommandOpener {
    pub fn new(program: String) -> Self {
        Self { program }
    }

    pub fn platform_default() -> Self {
        let program = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        Self::new(program.into())
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl NavigationProvider for CommandOpener {
    /// Spawns the opener and returns immediately. The child is reaped
    /// by the runtime in the background.
    fn open(&self, url: &str) -> Result<(), CapabilityError> {
        Command::new(&self.program)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|e| {
                CapabilityError::Navigate(format!("failed to spawn {}: {e}", self.program))
            })
    }
}
