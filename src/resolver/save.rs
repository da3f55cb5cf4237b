//! SaveProvider trait: fetch a URL and store it locally.

use std::path::PathBuf;

use futures::future::BoxFuture;

use super::CapabilityError;

/// Saves the resource behind a URL to local storage.
///
/// Fetch and storage semantics belong entirely to the implementation;
/// the caller only suggests a filename.
pub trait SaveProvider: Send + Sync {
    /// Save `url`, preferably as `suggested_filename`. Returns the path
    /// actually written.
    fn save<'a>(
        &'a self,
        url: &'a str,
        suggested_filename: &'a str,
    ) -> BoxFuture<'a, Result<PathBuf, CapabilityError>>;
}
