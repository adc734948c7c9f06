//! WHOIS age lookups via the system `whois` binary.
//!
//! Shodan's own recon crate reaches for a TCP WHOIS library; this pipeline
//! instead shells out to the system `whois`, matching the behaviour the
//! Python original relied on (including registry-specific response
//! formatting quirks that a raw TCP client would have to reimplement).

use std::num::NonZeroUsize;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::parse::registration_age_days;

/// Sentinel returned whenever a registration age cannot be determined,
/// matching the original tool's `-1` convention.
pub const UNKNOWN_AGE: i64 = -1;

struct CacheEntry {
    fetched_at: Instant,
    age_days: i64,
}

struct WhoisInner {
    semaphore: Semaphore,
    cache: Mutex<LruCache<String, CacheEntry>>,
    memo: Mutex<LruCache<String, String>>,
    ttl: Duration,
    timeout: Duration,
}

/// Concurrency-limited, TTL-cached client over the system `whois` binary.
///
/// Two caches are kept: an outer one mapping domain to a resolved age
/// (invalidated after `ttl`), and an inner one memoizing raw subprocess
/// stdout by domain so that a TTL expiry does not force a fresh process
/// spawn if nothing has changed upstream within the memo's retention.
pub struct WhoisClient {
    inner: WhoisInner,
}

impl WhoisClient {
    /// Build a client with the given concurrency cap, cache capacities and
    /// TTL, and per-lookup timeout.
    #[must_use]
    pub fn new(
        concurrency: usize,
        cache_capacity: usize,
        memo_capacity: usize,
        ttl: Duration,
        timeout: Duration,
    ) -> Self {
        let cache_cap = NonZeroUsize::new(cache_capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        let memo_cap = NonZeroUsize::new(memo_capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: WhoisInner {
                semaphore: Semaphore::new(concurrency.max(1)),
                cache: Mutex::new(LruCache::new(cache_cap)),
                memo: Mutex::new(LruCache::new(memo_cap)),
                ttl,
                timeout,
            },
        }
    }

    /// Look up the registration age of `domain` in days. Returns
    /// [`UNKNOWN_AGE`] (never an error) on any failure: missing binary,
    /// timeout, unparseable output. Also reports whether the result came
    /// from the TTL cache, so the caller can feed pipeline metrics.
    #[instrument(skip(self), fields(domain = %domain))]
    pub async fn registration_age(&self, domain: &str) -> (i64, bool) {
        if let Some(entry) = self.fresh_cached(domain) {
            return (entry, true);
        }

        let age = self.resolve(domain).await;

        if let Ok(mut cache) = self.inner.cache.lock() {
            cache.put(
                domain.to_string(),
                CacheEntry {
                    fetched_at: Instant::now(),
                    age_days: age,
                },
            );
        }

        (age, false)
    }

    fn fresh_cached(&self, domain: &str) -> Option<i64> {
        let mut cache = self.inner.cache.lock().ok()?;
        let entry = cache.get(domain)?;
        if entry.fetched_at.elapsed() < self.inner.ttl {
            Some(entry.age_days)
        } else {
            None
        }
    }

    async fn resolve(&self, domain: &str) -> i64 {
        let _permit = match self.inner.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => return UNKNOWN_AGE,
        };

        let raw = match self.memoized_raw(domain) {
            Some(raw) => raw,
            None => match self.spawn_whois(domain).await {
                Ok(raw) => {
                    if let Ok(mut memo) = self.inner.memo.lock() {
                        memo.put(domain.to_string(), raw.clone());
                    }
                    raw
                }
                Err(e) => {
                    warn!(domain, error = %e, "whois lookup failed");
                    return UNKNOWN_AGE;
                }
            },
        };

        match registration_age_days(domain, &raw, chrono::Utc::now()) {
            Ok(days) => days,
            Err(e) => {
                debug!(domain, error = %e, "could not determine registration age");
                UNKNOWN_AGE
            }
        }
    }

    fn memoized_raw(&self, domain: &str) -> Option<String> {
        self.inner.memo.lock().ok()?.get(domain).cloned()
    }

    async fn spawn_whois(&self, domain: &str) -> crate::error::Result<String> {
        let timeout = self.inner.timeout;
        let child = Command::new("whois")
            .arg(domain)
            .env("TERM", "dumb")
            .env("PAGER", "cat")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(timeout, child).await {
            Ok(Ok(output)) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            Ok(Err(e)) => Err(crate::error::WhoisError::Spawn(e.to_string())),
            Err(_) => Err(crate::error::WhoisError::Timeout(timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WhoisClient {
        WhoisClient::new(10, 3000, 10_000, Duration::from_secs(3600), Duration::from_secs(5))
    }

    #[test]
    fn cache_starts_empty() {
        let c = client();
        assert!(c.fresh_cached("example.com").is_none());
    }

    #[test]
    fn cached_entry_is_returned_within_ttl() {
        let c = client();
        {
            let mut cache = c.inner.cache.lock().unwrap();
            cache.put(
                "example.com".to_string(),
                CacheEntry {
                    fetched_at: Instant::now(),
                    age_days: 42,
                },
            );
        }
        assert_eq!(c.fresh_cached("example.com"), Some(42));
    }

    #[test]
    fn expired_entry_is_not_returned() {
        let c = WhoisClient::new(10, 3000, 10_000, Duration::from_millis(1), Duration::from_secs(5));
        {
            let mut cache = c.inner.cache.lock().unwrap();
            cache.put(
                "example.com".to_string(),
                CacheEntry {
                    fetched_at: Instant::now() - Duration::from_secs(10),
                    age_days: 42,
                },
            );
        }
        assert!(c.fresh_cached("example.com").is_none());
    }
}
