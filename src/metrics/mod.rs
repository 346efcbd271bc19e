//! Benchmark metrics reporting
//!
//! Reads run results from CSV files under a data directory, computes success
//! rates per agent and per (agent, ladder), and prints a Slack Block-Kit
//! payload as a CI step output:
//!
//! ```text
//! ::set-output name=slack_payload::{"blocks":[...]}
//! ```
//!
//! Any failure while loading or aggregating still prints a payload, one that
//! reports the error.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod aggregate;
pub mod slack;

pub use aggregate::{aggregate, MetricsSummary, Rate};
pub use slack::{build_payload, error_payload};

/// Prefix of the single output line
pub const OUTPUT_PREFIX: &str = "::set-output name=slack_payload::";

#[derive(Debug)]
pub enum MetricsError {
    Io { path: PathBuf, source: std::io::Error },
    Csv { path: PathBuf, source: csv::Error },
    /// No CSV rows were found under the directory
    NoData(PathBuf),
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            MetricsError::Csv { path, source } => {
                write!(f, "invalid CSV in {}: {}", path.display(), source)
            }
            MetricsError::NoData(dir) => write!(f, "no result rows found under {}", dir.display()),
        }
    }
}

impl std::error::Error for MetricsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricsError::Io { source, .. } => Some(source),
            MetricsError::Csv { source, .. } => Some(source),
            MetricsError::NoData(_) => None,
        }
    }
}

/// One benchmark run. Extra CSV columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunRecord {
    pub agent: String,
    pub ladder: String,
    pub status: String,
}

impl RunRecord {
    pub fn is_success(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("success")
    }
}

/// Every `*.csv` file under `dir`, recursively, in sorted order
pub fn find_csv_files(dir: &Path) -> Result<Vec<PathBuf>, MetricsError> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current).map_err(|source| MetricsError::Io {
            path: current.clone(),
            source,
        })?;
        for entry in entries {
            let path = entry
                .map_err(|source| MetricsError::Io {
                    path: current.clone(),
                    source,
                })?
                .path();
            if path.is_dir() {
                pending.push(path);
            } else if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Parse every run from one CSV file
pub fn read_records(path: &Path) -> Result<Vec<RunRecord>, MetricsError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| MetricsError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    reader
        .deserialize()
        .map(|row| {
            row.map_err(|source| MetricsError::Csv {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}

/// Load all runs under `dir`
pub fn load_records(dir: &Path) -> Result<Vec<RunRecord>, MetricsError> {
    let mut records = Vec::new();
    for file in find_csv_files(dir)? {
        records.extend(read_records(&file)?);
    }
    if records.is_empty() {
        return Err(MetricsError::NoData(dir.to_path_buf()));
    }
    Ok(records)
}

/// Build the payload for `dir`, falling back to an error payload
pub fn payload_for_dir(dir: &Path) -> serde_json::Value {
    match load_records(dir) {
        Ok(records) => build_payload(&aggregate(&records)),
        Err(e) => {
            bevy::log::warn!("Metrics aggregation failed: {}", e);
            error_payload(&e.to_string())
        }
    }
}

/// The full output line for `dir`. Never fails.
pub fn render_output(dir: &Path) -> String {
    format!("{}{}", OUTPUT_PREFIX, payload_for_dir(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_match_is_case_insensitive() {
        let mut record = RunRecord {
            agent: "a".to_string(),
            ladder: "l".to_string(),
            status: "SUCCESS".to_string(),
        };
        assert!(record.is_success());
        record.status = " Success ".to_string();
        assert!(record.is_success());
        record.status = "failure".to_string();
        assert!(!record.is_success());
        record.status = "successful".to_string();
        assert!(!record.is_success());
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let err = load_records(Path::new("definitely/not/a/real/dir")).unwrap_err();
        assert!(matches!(err, MetricsError::Io { .. }));
    }
}
