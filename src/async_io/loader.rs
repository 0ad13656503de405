//! Boundary source implementations
//!
//! This module provides concrete implementations of the async loading trait:
//! one for the remote boundary API and one for a local mirror directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::common::traits::{BoundaryFuture, BoundarySource};
use crate::config::MapConfig;
use crate::error::{Error, FetchError, Result};
use crate::models::BoundaryPayload;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// File name of the boundary document for a region code
#[must_use]
pub fn topo_file_name(code: &str) -> String {
    format!("{code}.topo.json")
}

/// Remote boundary source (`GET <base>/<code>.topo.json`)
#[derive(Debug, Clone)]
pub struct HttpBoundarySource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBoundarySource {
    /// Create a source for `base_url` with an optional per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a source sharing an existing client
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// URL of the boundary document for a region code
    #[must_use]
    pub fn url_for(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, topo_file_name(code))
    }
}

impl BoundarySource for HttpBoundarySource {
    fn fetch<'a>(&'a self, code: &'a str) -> BoundaryFuture<'a> {
        Box::pin(async move {
            let url = self.url_for(code);
            let start = Instant::now();
            log_operation_start("Fetching boundary data from", &url);

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::transport(code, e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::status(
                    code,
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default(),
                ));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::transport(code, e.to_string()))?;
            let payload = BoundaryPayload::from_slice(code, &body)
                .map_err(|e| FetchError::transport(code, e.to_string()))?;

            log_operation_complete("parsed", &url, payload.len(), Some(start.elapsed()));
            Ok(payload)
        })
    }

    fn location(&self) -> String {
        self.base_url.clone()
    }
}

/// Local mirror of boundary documents (`<dir>/<code>.topo.json`)
#[derive(Debug, Clone)]
pub struct DirectoryBoundarySource {
    dir: PathBuf,
}

impl DirectoryBoundarySource {
    /// Create a source reading from `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the boundary document for a region code
    #[must_use]
    pub fn path_for(&self, code: &str) -> PathBuf {
        self.dir.join(topo_file_name(code))
    }

    /// Mirror directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BoundarySource for DirectoryBoundarySource {
    fn fetch<'a>(&'a self, code: &'a str) -> BoundaryFuture<'a> {
        Box::pin(async move {
            let path = self.path_for(code);
            log_operation_start("Reading boundary data from", path.display());

            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(FetchError::status(code, 404, "Not Found"));
                }
                Err(e) => return Err(FetchError::transport(code, e.to_string())),
            };

            let payload = BoundaryPayload::from_slice(code, &bytes)
                .map_err(|e| FetchError::transport(code, e.to_string()))?;
            log_operation_complete("parsed", path.display(), payload.len(), None);
            Ok(payload)
        })
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Boundary source selected by the configuration
///
/// A configured mirror directory wins over the remote API.
pub fn source_from_config(config: &MapConfig) -> Result<Arc<dyn BoundarySource>> {
    match &config.map_dir {
        Some(dir) => Ok(Arc::new(DirectoryBoundarySource::new(dir))),
        None => Ok(Arc::new(HttpBoundarySource::new(
            &config.base_url,
            config.request_timeout,
        )?)),
    }
}
