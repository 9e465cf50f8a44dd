//! Fetching and parsing the schema document.

use crate::ast::Schema;
use crate::error::Error;
use crate::parser::parse_schema;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Resource name appended to URL sources that end in `/`.
pub const SCHEMA_PATH: &str = "schema.xml";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Url(String),
    File(PathBuf),
}

impl SchemaSource {
    /// `http://` and `https://` values are URLs, anything else a file path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            SchemaSource::Url(value.to_string())
        } else {
            SchemaSource::File(PathBuf::from(value))
        }
    }

    /// Location actually read for this source.
    pub fn location(&self) -> String {
        match self {
            SchemaSource::Url(base) if base.ends_with('/') => format!("{base}{SCHEMA_PATH}"),
            SchemaSource::Url(url) => url.clone(),
            SchemaSource::File(path) => path.display().to_string(),
        }
    }
}

pub struct Loader {
    source: SchemaSource,
    timeout: Duration,
}

impl Loader {
    pub fn new(source: SchemaSource) -> Self {
        Self {
            source,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn source(&self) -> &SchemaSource {
        &self.source
    }

    /// Fetch the raw document text. No retries.
    pub async fn fetch_text(&self) -> Result<String, LoadError> {
        let location = self.source.location();
        debug!(source = %location, "loading schema");

        let result = match &self.source {
            SchemaSource::Url(_) => self.fetch_url(&location).await,
            SchemaSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|source| {
                LoadError::Io {
                    path: path.clone(),
                    source,
                }
            }),
        };

        match &result {
            Ok(text) => debug!(source = %location, bytes = text.len(), "schema fetched"),
            Err(e) => warn!(source = %location, error = %e, "schema fetch failed"),
        }
        result
    }

    async fn fetch_url(&self, url: &str) -> Result<String, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(LoadError::Client)?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|source| LoadError::Request {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|source| LoadError::Request {
            url: url.to_string(),
            source,
        })
    }

    /// Fetch and parse. Every call reads the source again.
    pub async fn load(&self) -> Result<Schema, Error> {
        let text = self.fetch_text().await?;
        let schema = parse_schema(&text)?;
        debug!(tables = schema.tables.len(), "schema parsed");
        Ok(schema)
    }
}
