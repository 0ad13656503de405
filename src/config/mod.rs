//! Configuration for the map engine.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default remote boundary data location
pub const DEFAULT_BASE_URL: &str = "https://geojson.cn/api/china/1.6.3";

/// Region code of the country-level boundary document
pub const DEFAULT_ROOT_CODE: &str = "100000";

/// Environment variable holding the person records as a JSON array
pub const DEFAULT_RECORDS_ENV_VAR: &str = "STUDENTS_DATA";

/// What the topology cache does with a fetch that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Evict failed entries so the next load issues a fresh request
    #[default]
    RetryOnFailure,
    /// Keep the rejection for the process lifetime
    CacheForever,
}

impl FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retry" | "retry-on-failure" => Ok(Self::RetryOnFailure),
            "cache" | "cache-forever" => Ok(Self::CacheForever),
            other => Err(Error::Config(format!("unknown failure policy: {other}"))),
        }
    }
}

/// Configuration for the map engine
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Base URL boundary documents are fetched from (`<base>/<code>.topo.json`)
    pub base_url: String,
    /// Local mirror of the boundary documents; takes precedence over `base_url`
    pub map_dir: Option<PathBuf>,
    /// Region code of the country-level document
    pub root_code: String,
    /// Failure caching policy of the topology cache
    pub failure_policy: FailurePolicy,
    /// Environment variable checked first for person records
    pub records_env_var: String,
    /// File read when the environment variable is not set
    pub records_path: PathBuf,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    /// Number of concurrent downloads during map synchronisation
    pub sync_concurrency: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            map_dir: None,
            root_code: DEFAULT_ROOT_CODE.to_string(),
            failure_policy: FailurePolicy::default(),
            records_env_var: DEFAULT_RECORDS_ENV_VAR.to_string(),
            records_path: PathBuf::from("data/students.json"),
            request_timeout: None,
            sync_concurrency: num_cpus::get(),
        }
    }
}

impl MapConfig {
    /// Build a configuration from `CLASSMAP_*` environment variables,
    /// falling back to the defaults for anything unset
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("CLASSMAP_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup("CLASSMAP_MAP_DIR") {
            config.map_dir = Some(PathBuf::from(dir));
        }
        if let Some(root) = lookup("CLASSMAP_ROOT_CODE") {
            config.root_code = root;
        }
        if let Some(policy) = lookup("CLASSMAP_FAILURE_POLICY") {
            config.failure_policy = policy.parse()?;
        }
        if let Some(path) = lookup("CLASSMAP_RECORDS") {
            config.records_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup("CLASSMAP_TIMEOUT_SECS") {
            let secs = parse_number::<u64>("CLASSMAP_TIMEOUT_SECS", &secs)?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(concurrency) = lookup("CLASSMAP_SYNC_CONCURRENCY") {
            config.sync_concurrency =
                parse_number::<usize>("CLASSMAP_SYNC_CONCURRENCY", &concurrency)?.max(1);
        }

        Ok(config)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| Error::Config(format!("{key} must be a non-negative integer, got {value:?}")))
}
