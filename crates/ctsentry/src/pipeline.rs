//! Wires the ingest client (C1), bounded work queue (C2), worker pool
//! (C3, plus C4/C5 side-service clients), and log writer (C6) into one
//! running pipeline, per the component diagram in §2.

use std::sync::Arc;
use std::time::Duration;

use ctsentry_core::{reference, AppConfig, BrandList, PipelineMetrics};
use ctsentry_engine::{EngineConfig, EngineContext, LogWriter, SeenAlerts, WorkerPool};
use ctsentry_ingest::IngestClient;
use ctsentry_permute::{PermuteClient, RetryConfig};
use ctsentry_whois::WhoisClient;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{PipelineError, Result};

/// A fully wired, ready-to-run instance of the pipeline. Built once from
/// validated configuration; every shared resource named in §5 (brand
/// list, reference sets, caches, semaphores) is constructed here and
/// handed to the components that need it.
pub struct Pipeline {
    config: AppConfig,
    metrics: Arc<PipelineMetrics>,
    ctx: Arc<EngineContext>,
}

impl Pipeline {
    /// Build the pipeline from validated configuration. Fails only on
    /// the fatal startup conditions named in §7 taxonomy #5: a missing
    /// or empty brand list, or an output directory that cannot be
    /// created.
    pub fn build(config: AppConfig) -> Result<Self> {
        config.validate().map_err(PipelineError::Config)?;
        config.ensure_output_dir().map_err(PipelineError::Config)?;

        let brands = BrandList::load(&config.brand_list_path).map_err(PipelineError::Config)?;
        let suspicious_tlds = reference::load_set_or_default(
            config.suspicious_tld_path.as_deref(),
            reference::DEFAULT_SUSPICIOUS_TLDS,
        );
        let keywords = reference::load_set_or_default(
            config.suspicious_keyword_path.as_deref(),
            reference::SUSPICIOUS_KEYWORDS,
        );
        let fp_patterns = reference::load_list_or_default(
            config.false_positive_path.as_deref(),
            reference::default_false_positive_patterns(),
        );

        let metrics = Arc::new(PipelineMetrics::new());

        let permute = PermuteClient::with_base_url(
            config.permutation_base_url.clone(),
            config.permutation_concurrency,
            RetryConfig {
                max_attempts: config.permutation_retries,
                backoff_base: 2.0,
                request_timeout: Duration::from_secs(config.permutation_timeout_secs),
            },
        );

        let whois = WhoisClient::new(
            config.whois_concurrency,
            config.whois_cache_capacity,
            config.whois_memo_capacity,
            Duration::from_secs(config.whois_ttl_secs),
            Duration::from_secs(config.whois_timeout_secs),
        );

        let ctx = Arc::new(EngineContext {
            brands,
            suspicious_tlds,
            keywords,
            fp_patterns,
            permute,
            whois,
            seen_alerts: SeenAlerts::new(config.dedup_window),
            metrics: metrics.clone(),
            config: EngineConfig {
                candidate_cap: config.candidate_cap,
                processed_cap: config.processed_cap,
                similarity_threshold: config.similarity_threshold,
            },
        });

        Ok(Self { config, metrics, ctx })
    }

    /// Run every component until `shutdown` is cancelled, then drain in
    /// order: ingest stops producing, workers finish in-flight items and
    /// exit once the queue closes, and the writer drains its channel
    /// before this returns (§5, Cancellation).
    pub async fn run(&self, shutdown: CancellationToken) {
        let (work_tx, work_rx) = mpsc::channel(self.config.queue_capacity);
        let (alert_tx, alert_rx) = mpsc::channel(self.config.queue_capacity);

        let ingest = IngestClient::new(self.config.ws_url.clone(), work_tx, self.metrics.clone());
        let ingest_shutdown = shutdown.clone();
        let ingest_handle = tokio::spawn(async move { ingest.run(ingest_shutdown).await });

        let writer = LogWriter::new(self.config.output_path.clone(), self.metrics.clone());
        let writer_handle = tokio::spawn(async move { writer.run(alert_rx).await });

        let metrics_handle = spawn_metrics_reporter(self.metrics.clone(), self.config.metrics_interval_secs, shutdown.clone());

        let pool = WorkerPool::new(self.ctx.clone());
        pool.run(self.config.workers, work_rx, alert_tx, shutdown.clone()).await;

        // Workers have drained the work queue; dropping the alert sender
        // (implicit once `pool.run` returns and its cloned senders are
        // gone) lets the writer observe channel closure and finish.
        let _ = writer_handle.await;

        shutdown.cancel();
        let _ = ingest_handle.await;
        metrics_handle.abort();

        info!("pipeline shut down cleanly");
    }
}

fn spawn_metrics_reporter(
    metrics: Arc<PipelineMetrics>,
    interval_secs: u64,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let snap = metrics.snapshot();
                    info!(
                        items_seen = snap.items_seen,
                        items_skipped = snap.items_skipped,
                        items_clean = snap.items_clean,
                        items_logged = snap.items_logged,
                        alerts_emitted = snap.alerts_emitted,
                        permutation_cache_hit_rate = cache_hit_rate(snap.permutation_cache_hits, snap.permutation_cache_misses),
                        whois_cache_hit_rate = cache_hit_rate(snap.whois_cache_hits, snap.whois_cache_misses),
                        "pipeline metrics"
                    );
                }
                () = shutdown.cancelled() => return,
            }
        }
    })
}

fn cache_hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        (hits as f64 / total as f64 * 10000.0).round() / 100.0
    }
}
