//! Capability abstraction: pluggable platform adapters.
//!
//! Everything the session does to the outside world after a link is
//! resolved (clipboard, native share, opening a browser, saving a
//! file) goes through one of these traits. Platform adapters implement
//! them; the front end composes a [`CapabilitySet`] at startup.

pub mod clipboard;
pub mod desktop;
pub mod navigate;
pub mod save;
pub mod share;

use std::sync::Arc;

pub use clipboard::ClipboardProvider;
pub use navigate::NavigationProvider;
pub use save::SaveProvider;
pub use share::{Availability, ShareProvider, ShareRequest};

/// Errors returned by capability adapters.
///
/// Cloneable so a failure can travel inside a notification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// Clipboard write failed (e.g. xclip not found, pipe error).
    #[error("clipboard: {0}")]
    Clipboard(String),

    /// The share target rejected or failed the request.
    #[error("share: {0}")]
    Share(String),

    /// The opener could not be launched.
    #[error("navigate: {0}")]
    Navigate(String),

    /// Fetching or writing the downloaded file failed.
    #[error("save: {0}")]
    Save(String),
}

/// A composed set of platform adapters.
///
/// Shared with background tasks, hence `Arc`.
#[derive(Clone)]
pub struct CapabilitySet {
    /// Writes the system clipboard.
    pub clipboard: Arc<dyn ClipboardProvider>,

    /// Hands a URL to a native share target, when one exists.
    pub share: Arc<dyn ShareProvider>,

    /// Opens a URL in a new browsing context.
    pub navigator: Arc<dyn NavigationProvider>,

    /// Fetches a URL and stores it locally.
    pub saver: Arc<dyn SaveProvider>,
}
