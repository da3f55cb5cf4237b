//! Desktop platform adapters: command-line tools behind the
//! capability traits.
//!
//! Clipboard, share, and opener adapters shell out to well-known
//! programs (`wl-copy`/`xclip`, a user-provided share command,
//! `xdg-open`). Saving downloads goes over HTTP directly.

pub mod clipboard;
pub mod navigate;
pub mod save;
pub mod share;

use std::sync::Arc;

use crate::config::Settings;

use super::CapabilitySet;

pub use clipboard::CommandClipboard;
pub use navigate::CommandOpener;
pub use save::HttpSaver;
pub use share::CommandShare;

/// Compose the desktop adapters for `settings`.
pub fn capabilities(settings: &Settings) -> Result<CapabilitySet, reqwest::Error> {
    let clipboard = match &settings.clipboard_command {
        Some(argv) => CommandClipboard::from_argv(argv),
        None => CommandClipboard::detect(),
    };
    let opener = match &settings.opener {
        Some(program) => CommandOpener::new(program.clone()),
        None => CommandOpener::platform_default(),
    };

    tracing::debug!(
        clipboard = %clipboard.program(),
        opener = %opener.program(),
        share = settings.share_command.is_some(),
        "desktop capabilities composed"
    );

    Ok(CapabilitySet {
        clipboard: Arc::new(clipboard),
        share: Arc::new(CommandShare::new(settings.share_command.clone())),
        navigator: Arc::new(opener),
        saver: Arc::new(HttpSaver::new(settings.download_dir.clone())?),
    })
}
