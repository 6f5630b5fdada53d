//! Knowledge sources the catalog is populated from

use super::SchemeRecord;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain a usable set of scheme records
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read knowledge file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Knowledge source unreachable: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Knowledge source returned status {0}")]
    Status(u16),
    #[error("Malformed knowledge data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate scheme id: {0}")]
    DuplicateId(String),
}

/// Read-only provider of scheme records
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Fetch and parse the full record set
    async fn fetch(&self) -> Result<Vec<SchemeRecord>, LoadError>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Parse a JSON array of scheme records
pub fn parse_records(data: &[u8]) -> Result<Vec<SchemeRecord>, LoadError> {
    Ok(serde_json::from_slice(data)?)
}

/// Scheme records stored in a local JSON file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl KnowledgeSource for FileSource {
    async fn fetch(&self) -> Result<Vec<SchemeRecord>, LoadError> {
        let data = tokio::fs::read(&self.path).await.map_err(|source| LoadError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        parse_records(&data)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Scheme records served over HTTP
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl KnowledgeSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<SchemeRecord>, LoadError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        parse_records(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source for a configured location: URLs go over HTTP, anything else is a file path
pub fn source_from_location(location: &str) -> Box<dyn KnowledgeSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}
