//! Log writer (C6): the single consumer that appends scored alerts to
//! the CSV sink, insulating workers from append latency and guaranteeing
//! the header row is written exactly once.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ctsentry_core::{AlertRecord, PipelineMetrics, CSV_HEADER};
use tokio::sync::mpsc::Receiver;
use tracing::{error, info};

use crate::error::EngineError;

/// Reads [`AlertRecord`]s off a dedicated channel and appends them as
/// CSV rows. Runs as a single task so rows are never interleaved.
pub struct LogWriter {
    path: PathBuf,
    metrics: Arc<PipelineMetrics>,
}

impl LogWriter {
    #[must_use]
    pub fn new(path: PathBuf, metrics: Arc<PipelineMetrics>) -> Self {
        Self { path, metrics }
    }

    /// Drain `receiver` until the channel closes (all senders dropped),
    /// appending each alert as one CSV row. I/O failures are logged and
    /// the loop continues — a lost alert is not a fatal condition (§7,
    /// taxonomy #3).
    pub async fn run(&self, mut receiver: Receiver<AlertRecord>) {
        while let Some(alert) = receiver.recv().await {
            if let Err(e) = self.append(&alert) {
                error!(error = %e, domain = %alert.domain, "failed to append alert row");
                continue;
            }
            self.metrics.inc_alerts();
        }
        info!("log writer drained, shutting down");
    }

    fn append(&self, alert: &AlertRecord) -> crate::Result<()> {
        write_row(&self.path, &alert.to_row())
    }
}

/// Append one row to `path`, writing the canonical header first if the
/// file is empty or does not yet exist.
fn write_row(path: &Path, row: &[String]) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| EngineError::OpenOutput {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }

    let needs_header = !path.exists() || std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| EngineError::OpenOutput {
            path: path.display().to_string(),
            source,
        })?;

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    if needs_header {
        writer.write_record(CSV_HEADER)?;
    }

    writer.write_record(row)?;
    writer.flush().map_err(|e| EngineError::Write(e.into()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctsentry_core::FeatureVector;

    fn sample_alert() -> AlertRecord {
        AlertRecord {
            seen_at: "2024-01-01T00:00:00".to_string(),
            domain: "gooogle.com".to_string(),
            brand_match: "google.com".to_string(),
            issuer_org: "Let's Encrypt".to_string(),
            features: FeatureVector {
                tld: "com".to_string(),
                tld_suspicious: false,
                has_keyword: false,
                entropy: 3.1,
                cn_mismatch: false,
                ocsp_missing: false,
                short_lived: false,
                brand_in_subdomain: false,
                similarity_score: 0.95,
                registration_days: 3,
            },
            score: 6.0,
        }
    }

    #[test]
    fn writes_header_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_row(&path, &sample_alert().to_row()).unwrap();
        write_row(&path, &sample_alert().to_row()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 rows
        assert_eq!(lines[0], CSV_HEADER.join(","));
    }

    #[test]
    fn creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("output").join("out.csv");
        write_row(&path, &sample_alert().to_row()).unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn run_drains_channel_and_increments_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let metrics = Arc::new(PipelineMetrics::new());
        let writer = LogWriter::new(path.clone(), metrics.clone());

        let (tx, rx) = tokio::sync::mpsc::channel(8);
        tx.send(sample_alert()).await.unwrap();
        drop(tx);

        writer.run(rx).await;

        assert_eq!(metrics.snapshot().alerts_emitted, 1);
        assert!(path.exists());
    }
}
