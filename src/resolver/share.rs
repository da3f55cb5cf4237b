//! ShareProvider trait: native share sheet abstraction.
//!
//! Whether sharing is possible depends on the environment, so callers
//! ask [`ShareProvider::availability`] every time the user shares
//! instead of deciding once at startup.

use futures::future::BoxFuture;

use super::CapabilityError;

/// Whether a capability can be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
}

/// What gets handed to the share target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub url: String,
}

pub trait ShareProvider: Send + Sync {
    /// Queried at action time.
    fn availability(&self) -> Availability;

    /// Share `request`. Only called after `availability()` returned
    /// [`Availability::Available`].
    fn share<'a>(&'a self, request: &'a ShareRequest) -> BoxFuture<'a, Result<(), CapabilityError>>;
}
