//! Local mirror synchronisation of boundary documents
//!
//! Downloads the country document and every province document listed in the
//! remote `_meta.json` into a directory that `DirectoryBoundarySource` can
//! serve from.

use std::path::{Path, PathBuf};
use std::time::Instant;

use futures::stream::{self, StreamExt};
use itertools::Itertools;
use serde_json::Value;

use crate::async_io::loader::topo_file_name;
use crate::config::MapConfig;
use crate::error::util::ensure_directory;
use crate::error::{Error, Result};
use crate::utils::logging::{
    create_main_progress_bar, finish_progress_bar, log_operation_complete, log_operation_start,
    log_warning,
};

/// Outcome of one synchronisation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Codes written to disk
    pub downloaded: Vec<String>,
    /// Codes refused with 401/403
    pub skipped: Vec<String>,
    /// Codes that failed for any other reason
    pub failed: Vec<String>,
}

#[derive(Debug)]
enum DownloadOutcome {
    Downloaded,
    Forbidden,
    Failed,
}

/// Province codes listed under the country entry of a `_meta.json` document
///
/// Only six-digit codes are kept; duplicates are dropped, first occurrence
/// wins.
#[must_use]
pub fn collect_province_codes(meta: &Value, root_code: &str) -> Vec<String> {
    let files = meta
        .get("files")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    files
        .iter()
        .find(|file| file.get("filename").and_then(Value::as_str) == Some(root_code))
        .and_then(|country| country.get("children"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|province| match province.get("filename")? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|code| is_region_code(code))
        .unique()
        .collect()
}

fn is_region_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Downloader for a local boundary mirror
#[derive(Debug, Clone)]
pub struct MapSync {
    client: reqwest::Client,
    base_url: String,
    root_code: String,
    output_dir: PathBuf,
    concurrency: usize,
}

impl MapSync {
    /// Create a downloader writing into `output_dir`
    pub fn new(config: &MapConfig, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            root_code: config.root_code.clone(),
            output_dir: output_dir.into(),
            concurrency: config.sync_concurrency.max(1),
        })
    }

    /// Directory documents are written to
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Fetch the metadata document and mirror the root and province documents
    ///
    /// # Errors
    /// Fails when the output directory cannot be created or the metadata
    /// document cannot be fetched. Individual document failures are only
    /// counted in the report.
    pub async fn run(&self) -> Result<SyncReport> {
        let start = Instant::now();
        ensure_directory(&self.output_dir, "boundary mirror").await?;

        let meta_url = format!("{}/_meta.json", self.base_url);
        log_operation_start("Fetching map metadata from", &meta_url);
        let meta = self.fetch_json(&meta_url).await?;

        let provinces = collect_province_codes(&meta, &self.root_code);
        log::info!("Found {} province documents", provinces.len());

        let codes: Vec<String> = std::iter::once(self.root_code.clone())
            .chain(provinces)
            .unique()
            .collect();

        let pb = create_main_progress_bar(codes.len() as u64, Some("Downloading boundary data"));
        let outcomes = stream::iter(codes)
            .map(|code| {
                let pb = pb.clone();
                async move {
                    let outcome = self.download(&code).await;
                    pb.inc(1);
                    (code, outcome)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;
        finish_progress_bar(&pb, Some("Boundary data synchronised"));

        let mut report = SyncReport::default();
        for (code, outcome) in outcomes.into_iter().sorted_by(|a, b| a.0.cmp(&b.0)) {
            match outcome {
                DownloadOutcome::Downloaded => report.downloaded.push(code),
                DownloadOutcome::Forbidden => report.skipped.push(code),
                DownloadOutcome::Failed => report.failed.push(code),
            }
        }

        log_operation_complete(
            "downloaded",
            &self.base_url,
            report.downloaded.len(),
            Some(start.elapsed()),
        );
        if !report.failed.is_empty() || !report.skipped.is_empty() {
            log::warn!(
                "{} documents failed, {} refused: {}",
                report.failed.len(),
                report.skipped.len(),
                report.failed.iter().chain(&report.skipped).join(", ")
            );
        }

        Ok(report)
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("request to {url} failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Other(anyhow::anyhow!(
                "HTTP {} {} - {url}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Other(anyhow::anyhow!("invalid JSON from {url}: {e}")))
    }

    async fn download(&self, code: &str) -> DownloadOutcome {
        let file_name = topo_file_name(code);
        let url = format!("{}/{file_name}", self.base_url);
        let output = self.output_dir.join(&file_name);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                log_warning(&format!("Download of {code} failed: {e}"), Some(&url));
                return DownloadOutcome::Failed;
            }
        };

        let status = response.status();
        if matches!(status.as_u16(), 401 | 403) {
            log_warning(&format!("No permission to download {code}: HTTP {status}"), Some(&url));
            return DownloadOutcome::Forbidden;
        }
        if !status.is_success() {
            log_warning(&format!("Download of {code} failed: HTTP {status}"), Some(&url));
            return DownloadOutcome::Failed;
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                log_warning(&format!("Download of {code} was interrupted: {e}"), Some(&url));
                return DownloadOutcome::Failed;
            }
        };

        match tokio::fs::write(&output, &body).await {
            Ok(()) => {
                log::debug!("Wrote {}", output.display());
                DownloadOutcome::Downloaded
            }
            Err(e) => {
                log_warning(&format!("Failed to write {code}: {e}"), Some(&output.display()));
                DownloadOutcome::Failed
            }
        }
    }
}

/// Default mirror location for a map version, `maps/china/<version>`
#[must_use]
pub fn default_mirror_dir(base_url: &str) -> PathBuf {
    let version = base_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| segment.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .unwrap_or("latest");
    Path::new("maps").join("china").join(version)
}
