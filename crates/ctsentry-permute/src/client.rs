//! Client for the dnstwister typo-permutation HTTP service.

use std::num::NonZeroU32;
use std::sync::Mutex;
use std::time::Duration;

use governor::{Quota, RateLimiter};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::error::{PermuteError, Result};

const DEFAULT_BASE_URL: &str = "https://dnstwister.report/api";

/// Maximum number of permutations retained per domain, matching the
/// candidate cap applied before screening.
const MAX_PERMUTATIONS: usize = 30;

type Limiter =
    RateLimiter<governor::state::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_base: f64,
    pub request_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: 2.0,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// Backoff for a given zero-indexed attempt: `backoff_base ^ attempt` seconds.
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        Duration::from_secs_f64(self.backoff_base.powi(attempt as i32))
    }
}

#[derive(Debug, Deserialize)]
struct HexResponse {
    domain_as_hexadecimal: String,
}

#[derive(Debug, Deserialize)]
struct FuzzResponse {
    #[serde(default)]
    fuzzy_domains: Vec<FuzzyDomain>,
}

#[derive(Debug, Deserialize)]
struct FuzzyDomain {
    domain: String,
}

struct ClientInner {
    http: HttpClient,
    base_url: String,
    retry: RetryConfig,
    semaphore: Semaphore,
    limiter: Limiter,
    cache: Mutex<HashMap<String, Vec<String>>>,
}

/// Process-lifetime-cached client over `https://dnstwister.report/api`.
///
/// A semaphore bounds how many permutation requests run concurrently
/// (the stated external concurrency limit); a token-bucket limiter on
/// top smooths sustained request rate so a burst of work items does not
/// hammer the upstream service the instant permits free up.
pub struct PermuteClient {
    inner: ClientInner,
}

impl PermuteClient {
    #[must_use]
    pub fn new(concurrency: usize, retry: RetryConfig) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), concurrency, retry)
    }

    #[must_use]
    pub fn with_base_url(base_url: String, concurrency: usize, retry: RetryConfig) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(concurrency.max(1) as u32).unwrap_or(NonZeroU32::MIN));
        Self {
            inner: ClientInner {
                http: HttpClient::new(),
                base_url,
                retry,
                semaphore: Semaphore::new(concurrency.max(1)),
                limiter: RateLimiter::direct(quota),
                cache: Mutex::new(HashMap::new()),
            },
        }
    }

    /// Fetch permutations for `domain`, truncated to [`MAX_PERMUTATIONS`].
    /// Cached for the lifetime of the process once a domain resolves.
    #[instrument(skip(self), fields(domain = %domain))]
    pub async fn get_permutations(&self, domain: &str) -> Result<(Vec<String>, bool)> {
        if let Some(cached) = self.cached(domain) {
            return Ok((cached, true));
        }

        let _permit = self
            .inner
            .semaphore
            .acquire()
            .await
            .map_err(|_| PermuteError::Http("semaphore closed".to_string()))?;

        let hex = self.with_retry(|| self.fetch_hex(domain)).await?;
        let mut permutations = self.with_retry(|| self.fetch_fuzz(&hex)).await?;
        permutations.truncate(MAX_PERMUTATIONS);

        if let Ok(mut cache) = self.inner.cache.lock() {
            cache.insert(domain.to_string(), permutations.clone());
        }

        Ok((permutations, false))
    }

    fn cached(&self, domain: &str) -> Option<Vec<String>> {
        self.inner.cache.lock().ok()?.get(domain).cloned()
    }

    async fn with_retry<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            self.inner.limiter.until_ready().await;
            match tokio::time::timeout(self.inner.retry.request_timeout, f()).await {
                Ok(Ok(value)) => return Ok(value),
                // A 4xx is a terminal client error (bad domain, not-found hex
                // encoding, ...): retrying would just repeat the same
                // rejection, so it skips straight to the caller.
                Ok(Err(e @ PermuteError::Status(code))) if (400..500).contains(&code) => {
                    return Err(e)
                }
                Ok(Err(e)) if attempt + 1 >= self.inner.retry.max_attempts => return Err(e),
                Err(_) if attempt + 1 >= self.inner.retry.max_attempts => {
                    return Err(PermuteError::Timeout)
                }
                Ok(Err(e)) => {
                    warn!(attempt, error = %e, "permutation request failed, retrying");
                }
                Err(_) => {
                    warn!(attempt, "permutation request timed out, retrying");
                }
            }
            tokio::time::sleep(self.inner.retry.backoff_for(attempt)).await;
            attempt += 1;
        }
    }

    async fn fetch_hex(&self, domain: &str) -> Result<String> {
        let url = format!("{}/to_hex/{domain}", self.inner.base_url);
        debug!(url = %url, "fetching hex encoding");
        let resp = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PermuteError::Http(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(PermuteError::Status(resp.status().as_u16()));
        }
        let body: HexResponse = resp.json().await.map_err(|e| PermuteError::Http(e.to_string()))?;
        if body.domain_as_hexadecimal.is_empty() {
            return Err(PermuteError::MissingHex);
        }
        Ok(body.domain_as_hexadecimal)
    }

    async fn fetch_fuzz(&self, hex: &str) -> Result<Vec<String>> {
        let url = format!("{}/fuzz/{hex}", self.inner.base_url);
        debug!(url = %url, "fetching fuzzed permutations");
        let resp = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PermuteError::Http(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(PermuteError::Status(resp.status().as_u16()));
        }
        let body: FuzzResponse = resp.json().await.map_err(|e| PermuteError::Http(e.to_string()))?;
        Ok(body.fuzzy_domains.into_iter().map(|f| f.domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let retry = RetryConfig::default();
        assert_eq!(retry.backoff_for(0), Duration::from_secs(1));
        assert_eq!(retry.backoff_for(1), Duration::from_secs(2));
        assert_eq!(retry.backoff_for(2), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn cache_is_empty_before_first_fetch() {
        let client = PermuteClient::new(5, RetryConfig::default());
        assert!(client.cached("example.com").is_none());
    }

    #[tokio::test]
    async fn successful_fetch_populates_cache() {
        let client = PermuteClient::new(5, RetryConfig::default());
        {
            let mut cache = client.inner.cache.lock().unwrap();
            cache.insert("example.com".to_string(), vec!["exampl3.com".to_string()]);
        }
        let (permutations, hit) = client.get_permutations("example.com").await.unwrap();
        assert!(hit);
        assert_eq!(permutations, vec!["exampl3.com".to_string()]);
    }

    #[tokio::test]
    async fn successful_round_trip_against_mock_service() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/to_hex/example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "domain_as_hexadecimal": "6578616d706c652e636f6d"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fuzz/6578616d706c652e636f6d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "fuzzy_domains": [{"domain": "exampl3.com"}, {"domain": "examp1e.com"}]
            })))
            .mount(&server)
            .await;

        let client = PermuteClient::with_base_url(server.uri(), 5, RetryConfig::default());
        let (permutations, hit) = client.get_permutations("example.com").await.unwrap();
        assert!(!hit);
        assert_eq!(permutations, vec!["exampl3.com".to_string(), "examp1e.com".to_string()]);
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/to_hex/bad.com"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1) // a 4xx must not be retried
            .mount(&server)
            .await;

        let client = PermuteClient::with_base_url(server.uri(), 5, RetryConfig::default());
        let err = client.get_permutations("bad.com").await.unwrap_err();
        assert!(matches!(err, PermuteError::Status(404)));
    }
}
