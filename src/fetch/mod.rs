//! Source fetcher: pulls raw script text from HTTP(S) URLs or the local filesystem.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::FetchError;
use crate::script::{Script, ScriptSource};

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieve the full raw content behind `source`.
    async fn fetch_raw(&self, source: &ScriptSource) -> Result<String, FetchError>;

    async fn fetch(&self, source: &ScriptSource) -> Result<Script, FetchError> {
        let raw = self.fetch_raw(source).await?;
        Ok(Script::parse(&raw))
    }
}

#[derive(Debug, Clone)]
pub struct SourceFetcher {
    http: reqwest::Client,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    async fn fetch_http(&self, source: &ScriptSource) -> Result<String, FetchError> {
        let resp = self
            .http
            .get(source.as_str())
            .send()
            .await
            .map_err(|cause| FetchError::Request { locator: source.clone(), cause })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { locator: source.clone(), status });
        }

        resp.text()
            .await
            .map_err(|cause| FetchError::Request { locator: source.clone(), cause })
    }

    async fn fetch_file(&self, source: &ScriptSource, path: &str) -> Result<String, FetchError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|cause| FetchError::Io { locator: source.clone(), cause })
    }
}

#[async_trait]
impl Fetcher for SourceFetcher {
    async fn fetch_raw(&self, source: &ScriptSource) -> Result<String, FetchError> {
        let locator = source.as_str();
        if locator.starts_with("http://") || locator.starts_with("https://") {
            self.fetch_http(source).await
        } else {
            let path = locator.strip_prefix("file://").unwrap_or(locator);
            self.fetch_file(source, path).await
        }
    }
}
