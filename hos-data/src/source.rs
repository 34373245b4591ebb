//! Dataset retrieval backends.
//!
//! A [`DatasetSource`] hands back the raw JSON bytes of a named dataset.
//! Parsing and integrity checks happen in the store, so every source only
//! has to report transport failures.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{DataError, Result};
use crate::store::DatasetName;

/// Retrieves dataset payloads by logical name
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch the raw bytes of `dataset`
    async fn fetch(&self, dataset: DatasetName) -> Result<Vec<u8>>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Reads `<dir>/<name>.json` from the local filesystem
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, dataset: DatasetName) -> PathBuf {
        self.root.join(dataset.file_name())
    }
}

#[async_trait]
impl DatasetSource for DirectorySource {
    async fn fetch(&self, dataset: DatasetName) -> Result<Vec<u8>> {
        let path = self.path_for(dataset);
        tokio::fs::read(&path)
            .await
            .map_err(|e| DataError::unavailable(dataset, format!("{}: {}", path.display(), e)))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// GETs `<base_url>/<name>.json` from a static file host
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn url_for(&self, dataset: DatasetName) -> String {
        format!("{}/{}", self.base_url, dataset.file_name())
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self, dataset: DatasetName) -> Result<Vec<u8>> {
        let url = self.url_for(dataset);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::unavailable(dataset, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::unavailable(
                dataset,
                format!("HTTP {status} from {url}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DataError::unavailable(dataset, e))?;
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
