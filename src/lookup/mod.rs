//! Metadata lookup: turn an identifier into a content URL.
//!
//! The remote service is a black box behind [`MetadataService`]. The
//! only contract relied on is the shape of the record returned by
//! `GET <base>/knows/{identifier}`:
//!
//! ```json
//! { "documents": [{ "contentUrl": "..." }], "thumbnailSmallUrl": "..." }
//! ```
//!
//! Everything else in the record is ignored.

pub mod http;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::extract::Identifier;

pub use http::HttpMetadataService;

/// Public API edge used when no base is configured.
pub const DEFAULT_API_BASE: &str = "https://apiedge-eu-central-1.knowunity.com";

/// Errors returned by a metadata lookup.
///
/// Payloads are strings so the error can be cloned into notifications.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Connection, TLS, or body read failure.
    #[error("transport: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("service returned status {0}")]
    Status(u16),

    /// The body was not a record of the expected shape.
    #[error("malformed record: {0}")]
    Malformed(String),

    /// The record decoded but listed no documents.
    #[error("record contains no documents")]
    NoDocuments,
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedContent {
    /// Direct URL of the first document.
    pub content_url: String,
    /// Small thumbnail of the shared item.
    pub preview_url: String,
}

/// Looks up shared-document metadata by identifier.
///
/// `Send + Sync` because the session controller runs each lookup on
/// its own task.
pub trait MetadataService: Send + Sync {
    /// Resolve `identifier` into content and preview URLs.
    ///
    /// Exactly one request per call; no retries.
    fn lookup<'a>(
        &'a self,
        identifier: &'a Identifier,
    ) -> BoxFuture<'a, Result<ResolvedContent, LookupError>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KnowRecord {
    #[serde(default)]
    documents: Vec<DocumentDescriptor>,
    thumbnail_small_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentDescriptor {
    content_url: String,
}

/// Decode a service record body into [`ResolvedContent`].
///
/// The first document wins; the rest are ignored.
pub fn parse_record(body: &[u8]) -> Result<ResolvedContent, LookupError> {
    let record: KnowRecord =
        serde_json::from_slice(body).map_err(|e| LookupError::Malformed(e.to_string()))?;
    let first = record
        .documents
        .into_iter()
        .next()
        .ok_or(LookupError::NoDocuments)?;
    Ok(ResolvedContent {
        content_url: first.content_url,
        preview_url: record.thumbnail_small_url,
    })
}
