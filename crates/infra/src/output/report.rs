//! Report files for a finished batch
//!
//! Two files per run, named `[<prefix>-]wc-<cmd>-<YYYYmmddHHMMSS>`:
//! - `.xml`: the merged MARC collection, only when an item succeeded
//! - `-log.txt` or `-log.csv`: the status log

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use wcmeta_common::marcxml;
use wcmeta_domain::{BatchOutcome, Result};

use crate::errors::InfraError;

/// Status log layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain `<id>: <status>` lines
    #[default]
    Text,
    /// `record,status,response` rows
    Csv,
}

/// Paths written for one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub records: Option<PathBuf>,
    pub log: PathBuf,
}

/// Writes the merged records and status log of a batch.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    prefix: Option<String>,
    format: LogFormat,
    debug: bool,
}

impl ReportWriter {
    /// Writer placing files in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), prefix: None, format: LogFormat::Text, debug: false }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix.filter(|p| !p.trim().is_empty());
        self
    }

    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Put request traces at the top of the text log
    #[must_use]
    pub const fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// `[<prefix>-]wc-<cmd>-<YYYYmmddHHMMSS>`
    #[must_use]
    pub fn file_stem(&self, command: &str, at: NaiveDateTime) -> String {
        let prefix = self.prefix.as_deref().map(|p| format!("{p}-")).unwrap_or_default();
        format!("{prefix}wc-{command}-{}", at.format("%Y%m%d%H%M%S"))
    }

    /// Write the report stamped with the current local time.
    ///
    /// # Errors
    /// Returns `WcMetaError::Io` if a file cannot be written.
    pub fn write(&self, outcome: &BatchOutcome) -> Result<ReportFiles> {
        self.write_at(outcome, Local::now().naive_local())
    }

    /// Write the report stamped with `at`.
    ///
    /// # Errors
    /// Returns `WcMetaError::Io` if a file cannot be written.
    pub fn write_at(&self, outcome: &BatchOutcome, at: NaiveDateTime) -> Result<ReportFiles> {
        let stem = self.file_stem(outcome.operation.name(), at);

        let records = if outcome.any_succeeded() {
            let path = self.dir.join(format!("{stem}.xml"));
            write_file(&path, &marcxml::collection_document(&outcome.merged_records))?;
            Some(path)
        } else {
            None
        };

        let (log, contents) = match self.format {
            LogFormat::Text => (self.dir.join(format!("{stem}-log.txt")), render_text_log(outcome, self.debug)),
            LogFormat::Csv => (self.dir.join(format!("{stem}-log.csv")), render_csv_log(outcome)),
        };
        write_file(&log, &contents)?;

        tracing::info!(
            log = %log.display(),
            records = ?records.as_ref().map(|p| p.display().to_string()),
            "report written"
        );
        Ok(ReportFiles { records, log })
    }
}

/// Status log text, preceded by request traces when `debug` is set.
#[must_use]
pub fn render_text_log(outcome: &BatchOutcome, debug: bool) -> String {
    let mut log = String::new();
    if debug {
        log.push_str("CLIENT REQUEST(S)\n\n");
        for trace in &outcome.trace {
            log.push_str(trace);
            log.push_str("\n\n");
        }
    }

    log.push_str("RESULT(S)\n\n");
    for entry in &outcome.status_log {
        log.push_str(&entry.headline());
        log.push('\n');
        if let Some(detail) = entry.detail.as_deref().filter(|d| !d.is_empty()) {
            log.push_str(detail);
            log.push('\n');
        }
    }
    log
}

/// Status log as CSV with a `record,status,response` header.
#[must_use]
pub fn render_csv_log(outcome: &BatchOutcome) -> String {
    let mut csv = String::from("record,status,response\n");
    for entry in &outcome.status_log {
        let row = [entry.id.as_str(), entry.status.as_str(), entry.detail.as_deref().unwrap_or("")]
            .iter()
            .map(|field| csv_field(field))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&row);
        csv.push('\n');
    }
    csv
}

/// Lines printed after a batch.
#[must_use]
pub fn console_summary(outcome: &BatchOutcome, files: &ReportFiles) -> Vec<String> {
    let mut lines = vec![
        format!("OCLC WorldCat Metadata API: {} operation", capitalize(outcome.operation.name())),
        outcome.summary(),
    ];
    if outcome.holdings.set + outcome.holdings.failed > 0 {
        lines.push(format!(
            "Holdings set on {} and {} failed",
            outcome.holdings.set, outcome.holdings.failed
        ));
    }
    if let Some(records) = &files.records {
        lines.push(format!("Records written to {}", records.display()));
    }
    lines.push(format!("Log written to {}", files.log.display()));
    lines
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| InfraError::from(e).into())
}
