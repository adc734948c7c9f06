//! Worker pool (C3): the fixed-size pool of cooperative tasks that turns
//! each dequeued work item into zero or more scored alerts.
//!
//! A single [`mpsc::Receiver`] is shared behind a `tokio::sync::Mutex` so
//! that all workers compete for the next item in arrival order rather
//! than each owning a private queue — this is what makes the pool size
//! independent of the number of upstream producers.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use ctsentry_core::{AlertRecord, BrandList, PipelineMetrics, WorkItem};
use ctsentry_permute::PermuteClient;
use ctsentry_whois::WhoisClient;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::dedup::SeenAlerts;
use crate::domain::{self, Validation};
use crate::{features, scoring, similarity};

/// Tunables that govern candidate fan-out, independent of the shared
/// side-service clients (§4.3, §6 "Process-level tuning").
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub candidate_cap: usize,
    pub processed_cap: usize,
    pub similarity_threshold: f64,
}

/// Everything a worker needs to process one item: reference data, the
/// side-service clients, the dedup window, and pipeline metrics. Built
/// once at startup and shared via `Arc` across the whole pool.
pub struct EngineContext {
    pub brands: BrandList,
    pub suspicious_tlds: HashSet<String>,
    pub keywords: HashSet<String>,
    pub fp_patterns: Vec<String>,
    pub permute: PermuteClient,
    pub whois: WhoisClient,
    pub seen_alerts: SeenAlerts,
    pub metrics: Arc<PipelineMetrics>,
    pub config: EngineConfig,
}

/// Runs the fixed-size worker pool against a shared work-item receiver.
pub struct WorkerPool {
    ctx: Arc<EngineContext>,
}

impl WorkerPool {
    #[must_use]
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Spawn `workers` tasks draining `receiver` into `alert_tx` until the
    /// channel closes. Each task finishes the item it is currently
    /// processing before observing shutdown (§5, Cancellation).
    pub async fn run(
        &self,
        workers: usize,
        receiver: mpsc::Receiver<WorkItem>,
        alert_tx: mpsc::Sender<AlertRecord>,
        shutdown: CancellationToken,
    ) {
        let receiver = Arc::new(AsyncMutex::new(receiver));
        let mut handles = Vec::with_capacity(workers);

        for id in 0..workers {
            let ctx = self.ctx.clone();
            let receiver = receiver.clone();
            let alert_tx = alert_tx.clone();
            let shutdown = shutdown.clone();
            handles.push(tokio::spawn(async move {
                worker_loop(id, &ctx, &receiver, &alert_tx, &shutdown).await;
            }));
        }

        for handle in handles {
            let _ = handle.await;
        }
    }
}

async fn worker_loop(
    id: usize,
    ctx: &Arc<EngineContext>,
    receiver: &Arc<AsyncMutex<mpsc::Receiver<WorkItem>>>,
    alert_tx: &mpsc::Sender<AlertRecord>,
    shutdown: &CancellationToken,
) {
    loop {
        let item = {
            let mut guard = receiver.lock().await;
            tokio::select! {
                item = guard.recv() => item,
                () = shutdown.cancelled() => None,
            }
        };

        let Some(item) = item else {
            break;
        };

        process_item(ctx, &item, alert_tx).await;
    }
    info!(worker_id = id, "worker exiting");
}

#[instrument(skip(ctx, item, alert_tx), fields(domain = %item.domain))]
async fn process_item(
    ctx: &Arc<EngineContext>,
    item: &WorkItem,
    alert_tx: &mpsc::Sender<AlertRecord>,
) {
    match domain::validate(&item.domain) {
        Validation::Invalid => {
            info!("rejected malformed domain");
            ctx.metrics.inc_skipped();
        }
        Validation::IpLiteral => {
            score_candidates(ctx, item, vec![item.domain.clone()], alert_tx).await;
        }
        Validation::Domain => match ctx.permute.get_permutations(&item.domain).await {
            Ok((permutations, cache_hit)) => {
                ctx.metrics.inc_permutation_cache(cache_hit);
                let candidates = build_candidates(&item.domain, permutations, ctx.config.candidate_cap);
                score_candidates(ctx, item, candidates, alert_tx).await;
            }
            Err(e) => {
                warn!(error = %e, "permutation lookup failed, skipping item");
                ctx.metrics.inc_skipped();
            }
        },
    }
}

/// Build the ordered, deduplicated candidate list: the observed domain
/// first, then permutations in the order returned, truncated to `cap`.
fn build_candidates(domain: &str, permutations: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::with_capacity(cap);
    let mut candidates = Vec::with_capacity(cap);

    for candidate in std::iter::once(domain.to_string()).chain(permutations) {
        if candidates.len() >= cap {
            break;
        }
        if seen.insert(candidate.clone()) {
            candidates.push(candidate);
        }
    }

    candidates
}

/// Screen up to `processed_cap` candidates against the brand list,
/// scoring and emitting an alert for each one that passes similarity,
/// WHOIS enrichment, and dedup.
async fn score_candidates(
    ctx: &Arc<EngineContext>,
    item: &WorkItem,
    candidates: Vec<String>,
    alert_tx: &mpsc::Sender<AlertRecord>,
) {
    let mut any_alert = false;

    for candidate in candidates.into_iter().take(ctx.config.processed_cap) {
        let Some(m) = similarity::is_similar(
            &candidate,
            &ctx.brands,
            ctx.config.similarity_threshold,
            &ctx.fp_patterns,
        ) else {
            continue;
        };

        let (registration_days, cache_hit) = ctx.whois.registration_age(&candidate).await;
        ctx.metrics.inc_whois_cache(cache_hit);

        let feature_vector = features::extract(
            &candidate,
            &item.leaf_cert,
            m.similarity,
            registration_days,
            &ctx.suspicious_tlds,
            &ctx.keywords,
            ctx.brands.iter(),
            Utc::now(),
        );
        let score = scoring::score(&feature_vector, &item.issuer_org);

        if !ctx.seen_alerts.insert_if_absent((candidate.clone(), m.brand.clone())) {
            continue;
        }

        any_alert = true;
        let alert = AlertRecord {
            seen_at: item.seen_at.clone(),
            domain: candidate,
            brand_match: m.brand,
            issuer_org: item.issuer_org.clone(),
            features: feature_vector,
            score,
        };

        if alert_tx.send(alert).await.is_err() {
            // Writer has shut down; nothing left to do for this item.
            return;
        }
    }

    if any_alert {
        ctx.metrics.inc_logged();
    } else {
        ctx.metrics.inc_clean();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_candidates_dedupes_and_truncates() {
        let permutations = vec![
            "example.com".to_string(), // duplicate of the observed domain
            "examp1e.com".to_string(),
            "exampl3.com".to_string(),
        ];
        let candidates = build_candidates("example.com", permutations, 2);
        assert_eq!(candidates, vec!["example.com".to_string(), "examp1e.com".to_string()]);
    }

    #[test]
    fn build_candidates_always_leads_with_observed_domain() {
        let candidates = build_candidates("example.com", vec!["other.com".to_string()], 30);
        assert_eq!(candidates[0], "example.com");
    }
}
