use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::catalog::{Catalog, SourceInfo};
use crate::scoring::{InputRecord, ScoringResult};

/// A scoring result packaged for export.
///
/// The generation time lives here rather than on [`ScoringResult`] so that
/// scoring itself stays deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub generated_at: DateTime<Utc>,
    pub catalog_version: &'a str,
    pub source: &'a SourceInfo,
    pub elimination_threshold: i32,
    pub inputs: &'a InputRecord,
    pub result: &'a ScoringResult,
}

impl<'a> Report<'a> {
    pub fn new(catalog: &'a Catalog, inputs: &'a InputRecord, result: &'a ScoringResult) -> Self {
        Self {
            generated_at: Utc::now(),
            catalog_version: catalog.version(),
            source: catalog.source(),
            elimination_threshold: catalog.elimination_threshold(),
            inputs,
            result,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}

/// Save a report as JSON atomically
///
/// Uses atomic-write-file so a previous report is never left half-overwritten.
/// Creates the parent directory if it doesn't exist.
pub fn save_report(path: &Path, report: &Report) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize report")?;

    file.commit().context("Failed to save report")?;

    tracing::info!(path = %path.display(), "report saved");
    Ok(())
}
