//! HTTP save provider: download the content URL into a directory.
//!
//! The whole body is buffered and written with `tokio::fs::write`.
//! Shared documents are small PDFs; streaming is not worth it here.

use std::path::{Path, PathBuf};

use futures::future::BoxFuture;

use crate::resolver::{CapabilityError, SaveProvider};

pub struct HttpSaver {
    client: reqwest::Client,
    dir: PathBuf,
}

impl HttpSaver {
    pub fn new(dir: PathBuf) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("knowfetch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, dir })
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CapabilityError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CapabilityError::Save(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CapabilityError::Save(format!(
                "server returned status {}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CapabilityError::Save(format!("body read failed: {e}")))?;
        Ok(body.to_vec())
    }
}

impl SaveProvider for HttpSaver {
    fn save<'a>(
        &'a self,
        url: &'a str,
        suggested_filename: &'a str,
    ) -> BoxFuture<'a, Result<PathBuf, CapabilityError>> {
        Box::pin(async move {
            let body = self.fetch(url).await?;
            write_download(&self.dir, suggested_filename, &body).await
        })
    }
}

/// Write `content` to `dir/filename`. Path separators in `filename`
/// are replaced so the file always lands inside `dir`.
async fn write_download(
    dir: &Path,
    filename: &str,
    content: &[u8],
) -> Result<PathBuf, CapabilityError> {
    let safe = sanitize_filename(filename);
    let path = dir.join(safe);
    tokio::fs::write(&path, content)
        .await
        .map_err(|e| CapabilityError::Save(format!("failed to write {}: {e}", path.display())))?;
    Ok(path)
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "download".to_string(),
        _ => cleaned,
    }
}
