//! Person record loading
//!
//! Records are injected at deploy time through an environment variable
//! holding a JSON array; a local file is the fallback for development. Older
//! deployments wrote the records as a script (`let students = [...]`), which
//! is still accepted.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::config::MapConfig;
use crate::error::util::safe_read_to_string;
use crate::error::{Error, Result};
use crate::models::PersonRecord;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Parse a JSON array of person records
///
/// A leading `let <name> =` assignment and a trailing `;` are ignored.
pub fn parse_records(text: &str) -> Result<Vec<Arc<PersonRecord>>> {
    let json = strip_script_wrapper(text);
    let records: Vec<PersonRecord> = serde_json::from_str(json)
        .context("person records must be a JSON array of {name, province, city, school}")?;

    Ok(records.into_iter().map(Arc::new).collect())
}

fn strip_script_wrapper(text: &str) -> &str {
    let mut body = text.trim();
    for keyword in ["let ", "const ", "var "] {
        if let Some(rest) = body.strip_prefix(keyword) {
            if let Some((_, value)) = rest.split_once('=') {
                body = value.trim();
            }
            break;
        }
    }
    body.strip_suffix(';').unwrap_or(body).trim_end()
}

/// Load records from the environment value when present, otherwise from `path`
///
/// # Errors
/// Returns `Error::InvalidRecords` when neither source is available, and a
/// parse error when the chosen source is malformed.
pub async fn load_records_from(
    env_value: Option<String>,
    path: &Path,
) -> Result<Vec<Arc<PersonRecord>>> {
    if let Some(value) = env_value.filter(|value| !value.trim().is_empty()) {
        let records = parse_records(&value)?;
        log::info!("Loaded {} person records from the environment", records.len());
        return Ok(records);
    }

    if !path.exists() {
        return Err(Error::InvalidRecords(format!(
            "no records in the environment and {} does not exist",
            path.display()
        )));
    }

    log_operation_start("Reading person records from", path.display());
    let text = safe_read_to_string(path, "person records").await?;
    let records = parse_records(&text)?;
    log_operation_complete("read", path.display(), records.len(), None);
    Ok(records)
}

/// Load records the way the configuration describes
pub async fn load_records(config: &MapConfig) -> Result<Vec<Arc<PersonRecord>>> {
    let env_value = std::env::var(&config.records_env_var).ok();
    load_records_from(env_value, &config.records_path).await
}
