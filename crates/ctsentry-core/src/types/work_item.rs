//! Work items flowing from the ingest client into the worker pool.

use crate::types::cert::LeafCert;
use serde_json::Value;

/// One domain extracted from a certificate-update event, queued for
/// the worker pool. `domain` has already had a leading `*.` stripped.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub domain: String,
    pub issuer_org: String,
    pub seen_at: String,
    pub leaf_cert: LeafCert,
}

impl WorkItem {
    /// Strip a leading wildcard label, if present.
    #[must_use]
    pub fn normalize_domain(raw: &str) -> String {
        raw.strip_prefix("*.").unwrap_or(raw).to_string()
    }

    /// Build the work items for a single certificate event.
    #[must_use]
    pub fn expand(
        all_domains: &[String],
        issuer_org: &str,
        seen_at: &str,
        leaf_cert_raw: &Value,
    ) -> Vec<Self> {
        let leaf_cert = LeafCert::from_value(leaf_cert_raw);
        all_domains
            .iter()
            .map(|raw| Self {
                domain: Self::normalize_domain(raw),
                issuer_org: issuer_org.to_string(),
                seen_at: seen_at.to_string(),
                leaf_cert: leaf_cert.clone(),
            })
            .collect()
    }
}
