//! NavigationProvider trait: open a URL in a new browsing context.

use super::CapabilityError;

/// Opens URLs outside the application.
///
/// Fire and forget: implementations launch the opener and return
/// without waiting for the browser.
pub trait NavigationProvider: Send + Sync {
    fn open(&self, url: &str) -> Result<(), CapabilityError>;
}
