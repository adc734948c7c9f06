//! Layered configuration: CLI flags > environment variables > TOML file >
//! built-in defaults. This module owns the TOML/defaults layers; the CLI
//! crate is responsible for applying flag and env overrides on top of
//! [`AppConfig::load`]'s result.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_ws_url() -> String {
    "ws://127.0.0.1:8080".to_string()
}
fn default_workers() -> usize {
    10
}
fn default_queue_capacity() -> usize {
    2_000
}
fn default_output_path() -> PathBuf {
    PathBuf::from("output/suspected_phishing.csv")
}
fn default_brand_list_path() -> PathBuf {
    PathBuf::from("data/brands.txt")
}
fn default_similarity_threshold() -> f64 {
    0.8
}
fn default_dedup_window() -> usize {
    10_000
}
fn default_candidate_cap() -> usize {
    30
}
fn default_processed_cap() -> usize {
    20
}
fn default_permutation_base_url() -> String {
    "https://dnstwister.report/api".to_string()
}
fn default_permutation_concurrency() -> usize {
    30
}
fn default_permutation_retries() -> u32 {
    3
}
fn default_permutation_timeout_secs() -> u64 {
    10
}
fn default_whois_concurrency() -> usize {
    10
}
fn default_whois_ttl_secs() -> u64 {
    3_600
}
fn default_whois_cache_capacity() -> usize {
    3_000
}
fn default_whois_memo_capacity() -> usize {
    10_000
}
fn default_whois_timeout_secs() -> u64 {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_metrics_interval_secs() -> u64 {
    60
}

/// The single, layered configuration object parameterizing every tunable
/// named throughout the specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream certificate-update WebSocket URL.
    pub ws_url: String,
    /// Worker pool size (C3).
    pub workers: usize,
    /// Bounded work-queue capacity (C2).
    pub queue_capacity: usize,
    /// Output CSV path (C6).
    pub output_path: PathBuf,
    /// Brand list path; missing/empty is a fatal startup error.
    pub brand_list_path: PathBuf,
    /// Optional override for the suspicious-TLD set; falls back to the built-in default.
    pub suspicious_tld_path: Option<PathBuf>,
    /// Optional override for the suspicious-keyword set; falls back to the built-in default.
    pub suspicious_keyword_path: Option<PathBuf>,
    /// Optional override for the false-positive pattern list; falls back to the built-in default.
    pub false_positive_path: Option<PathBuf>,
    /// Minimum similarity for a brand match (§4.4.1).
    pub similarity_threshold: f64,
    /// Size of the `seen_alerts` dedup FIFO.
    pub dedup_window: usize,
    /// Max candidates considered per work item after truncation.
    pub candidate_cap: usize,
    /// Max candidates actually screened (WHOIS + scoring) per work item.
    pub processed_cap: usize,
    /// Base URL of the typo-permutation HTTP service.
    pub permutation_base_url: String,
    /// Process-wide cap on simultaneous permutation requests.
    pub permutation_concurrency: usize,
    /// Retry attempts per permutation sub-call.
    pub permutation_retries: u32,
    /// Per-request timeout for the permutation service.
    pub permutation_timeout_secs: u64,
    /// Process-wide cap on simultaneous WHOIS subprocesses.
    pub whois_concurrency: usize,
    /// WHOIS cache TTL.
    pub whois_ttl_secs: u64,
    /// WHOIS TTL-cache capacity (LRU eviction beyond this).
    pub whois_cache_capacity: usize,
    /// WHOIS raw-subprocess memoization capacity.
    pub whois_memo_capacity: usize,
    /// Per-lookup WHOIS subprocess timeout.
    pub whois_timeout_secs: u64,
    /// `tracing` env-filter directive / level.
    pub log_level: String,
    /// Emit structured JSON logs instead of human-readable text.
    pub log_json: bool,
    /// Interval between periodic `PipelineMetrics` reports.
    pub metrics_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            output_path: default_output_path(),
            brand_list_path: default_brand_list_path(),
            suspicious_tld_path: None,
            suspicious_keyword_path: None,
            false_positive_path: None,
            similarity_threshold: default_similarity_threshold(),
            dedup_window: default_dedup_window(),
            candidate_cap: default_candidate_cap(),
            processed_cap: default_processed_cap(),
            permutation_base_url: default_permutation_base_url(),
            permutation_concurrency: default_permutation_concurrency(),
            permutation_retries: default_permutation_retries(),
            permutation_timeout_secs: default_permutation_timeout_secs(),
            whois_concurrency: default_whois_concurrency(),
            whois_ttl_secs: default_whois_ttl_secs(),
            whois_cache_capacity: default_whois_cache_capacity(),
            whois_memo_capacity: default_whois_memo_capacity(),
            whois_timeout_secs: default_whois_timeout_secs(),
            log_level: default_log_level(),
            log_json: false,
            metrics_interval_secs: default_metrics_interval_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// any field the file omits. A missing file is not an error here —
    /// the binary only treats it as one when the user explicitly passed
    /// `--config` and the file is absent (see `ctsentry-cli`).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CoreError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Validate invariants that aren't expressible in the type system
    /// alone (e.g. a threshold that must stay within `[0, 1]`).
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(CoreError::Invalid(format!(
                "similarity_threshold must be in [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.workers == 0 {
            return Err(CoreError::Invalid("workers must be > 0".to_string()));
        }
        if self.candidate_cap == 0 || self.processed_cap == 0 {
            return Err(CoreError::Invalid(
                "candidate_cap and processed_cap must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Ensure the output file's parent directory exists.
    pub fn ensure_output_dir(&self) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| CoreError::OutputDir {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_spec_constants() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.workers, 10);
        assert_eq!(cfg.dedup_window, 10_000);
        assert_eq!(cfg.candidate_cap, 30);
        assert_eq!(cfg.processed_cap, 20);
        assert!((cfg.similarity_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(cfg.whois_cache_capacity, 3_000);
        assert_eq!(cfg.whois_memo_capacity, 10_000);
        assert_eq!(cfg.whois_ttl_secs, 3_600);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers = 4\nws_url = \"ws://example.com:9999\"").unwrap();
        let cfg = AppConfig::load(file.path()).unwrap();
        assert_eq!(cfg.workers, 4);
        assert_eq!(cfg.ws_url, "ws://example.com:9999");
        assert_eq!(cfg.candidate_cap, 30); // untouched default
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        let mut cfg = AppConfig::default();
        cfg.similarity_threshold = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let mut cfg = AppConfig::default();
        cfg.workers = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
