//! HTTP metadata service: `GET <base>/knows/{identifier}` via reqwest.
//!
//! No timeout or retry is configured here; a single attempt per call,
//! with the transport's own defaults.

use futures::future::BoxFuture;

use super::{LookupError, MetadataService, ResolvedContent, parse_record};
use crate::extract::Identifier;

pub struct HttpMetadataService {
    client: reqwest::Client,
    base: String,
}

impl HttpMetadataService {
    /// Create a service rooted at `base` (scheme and host, optionally a
    /// path prefix). A trailing slash is ignored.
    pub fn new(base: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("knowfetch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, identifier: &Identifier) -> String {
        format!("{}/knows/{}", self.base, identifier.as_str())
    }

    async fn fetch(&self, identifier: &Identifier) -> Result<ResolvedContent, LookupError> {
        let url = self.endpoint(identifier);
        tracing::debug!(%url, "metadata lookup");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        parse_record(&body)
    }
}

impl MetadataService for HttpMetadataService {
    fn lookup<'a>(
        &'a self,
        identifier: &'a Identifier,
    ) -> BoxFuture<'a, Result<ResolvedContent, LookupError>> {
        Box::pin(self.fetch(identifier))
    }
}
