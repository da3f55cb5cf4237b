//! ClipboardProvider trait: system clipboard write abstraction.

use futures::future::BoxFuture;

use super::CapabilityError;

/// Writes text to the system clipboard.
///
/// The copy action awaits the returned future and reports the outcome
/// to the user, so implementations must not return before the
/// clipboard owner has the content.
pub trait ClipboardProvider: Send + Sync {
    /// Replace the clipboard content with `text`.
    fn write<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), CapabilityError>>;
}
