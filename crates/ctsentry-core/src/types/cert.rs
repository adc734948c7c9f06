//! Normalized view over the weakly-typed `leaf_cert` payload.
//!
//! The upstream CT firehose serializes `leaf_cert` as a loosely structured
//! JSON object whose shape drifts between CT log implementations: SAN
//! entries arrive as either a comma-separated string or a JSON array, and
//! certificate dates arrive as either ISO-8601 strings or UNIX epoch
//! integers. [`LeafCert::from_value`] is the single place that normalizes
//! this; every feature extractor downstream consumes [`LeafCert`], never
//! the raw JSON.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A certificate date as it may arrive from the firehose: either an
/// ISO-8601 string or a UNIX epoch integer.
#[derive(Debug, Clone)]
pub enum CertDate {
    Iso(String),
    Epoch(i64),
}

impl CertDate {
    /// Parse a JSON value into a `CertDate`, tolerating either shape.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Iso(s.clone())),
            Value::Number(n) => n.as_i64().map(Self::Epoch),
            _ => None,
        }
    }

    /// Resolve to a UTC timestamp, or `None` if malformed.
    #[must_use]
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Epoch(secs) => Utc.timestamp_opt(*secs, 0).single(),
            Self::Iso(s) => {
                // Accept a handful of ISO-8601 variants seen in the wild:
                // with/without fractional seconds, with/without a trailing Z.
                let trimmed = s.trim_end_matches('Z');
                NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
                    .ok()
                    .map(|naive| Utc.from_utc_datetime(&naive))
            }
        }
    }
}

/// Normalized leaf certificate data, extracted once per work item and
/// reused across every candidate's feature extraction.
#[derive(Debug, Clone, Default)]
pub struct LeafCert {
    /// Subject common name, if present and non-empty.
    pub subject_cn: Option<String>,
    /// Subject Alternative Name DNS entries, lowercased, `DNS:` stripped.
    pub san_dns_names: Vec<String>,
    /// True if an AIA OCSP responder URL or CRL distribution point is present.
    pub has_revocation_info: bool,
    /// Certificate validity start.
    pub not_before: Option<DateTime<Utc>>,
    /// Certificate validity end.
    pub not_after: Option<DateTime<Utc>>,
}

impl LeafCert {
    /// Build a normalized view from the raw `leaf_cert` JSON object.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let subject_cn = value
            .get("subject")
            .and_then(|s| s.get("CN"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let mut san_dns_names = extract_sans(value);
        // Fall back to `all_domains` embedded directly on the leaf cert,
        // which some CT log variants populate instead of `extensions`.
        if san_dns_names.is_empty() {
            if let Some(domains) = value.get("all_domains").and_then(Value::as_array) {
                san_dns_names = domains
                    .iter()
                    .filter_map(Value::as_str)
                    .map(normalize_san)
                    .collect();
            }
        }

        let has_revocation_info = has_aia_ocsp(value) || has_crl(value);

        let not_before = value
            .get("not_before")
            .and_then(CertDate::from_value)
            .as_ref()
            .and_then(CertDate::to_utc);
        let not_after = value
            .get("not_after")
            .and_then(CertDate::from_value)
            .as_ref()
            .and_then(CertDate::to_utc);

        Self {
            subject_cn,
            san_dns_names,
            has_revocation_info,
            not_before,
            not_after,
        }
    }

    /// True iff the subject CN does not match any SAN entry (wildcard-aware).
    #[must_use]
    pub fn cn_mismatch(&self) -> bool {
        let Some(cn) = self.subject_cn.as_deref() else {
            return false;
        };
        let cn = cn.to_lowercase();
        let cn = cn.strip_prefix("*.").unwrap_or(&cn);

        let covered = self.san_dns_names.iter().any(|san| {
            if let Some(suffix) = san.strip_prefix("*.") {
                cn == suffix || cn.ends_with(&format!(".{suffix}"))
            } else {
                san == cn
            }
        });

        !covered
    }

    /// Remaining validity in days from `now`, or `None` if dates are missing/malformed.
    #[must_use]
    pub fn remaining_validity_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.not_after.map(|na| (na - now).num_days())
    }
}

fn normalize_san(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("DNS:")
        .trim()
        .to_lowercase()
}

fn extract_sans(value: &Value) -> Vec<String> {
    let Some(san_value) = value.get("extensions").and_then(|e| e.get("subjectAltName")) else {
        return Vec::new();
    };

    match san_value {
        Value::String(s) => s.split(',').map(normalize_san).filter(|s| !s.is_empty()).collect(),
        Value::Array(entries) => entries
            .iter()
            .filter_map(Value::as_str)
            .map(normalize_san)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn has_aia_ocsp(value: &Value) -> bool {
    let candidates = [
        value.get("extensions").and_then(|e| e.get("authorityInfoAccess")),
        value.get("ocsp_urls"),
    ];
    candidates.into_iter().flatten().any(|v| match v {
        Value::String(s) => s.to_lowercase().contains("ocsp"),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|s| s.to_lowercase().contains("ocsp")),
        _ => false,
    })
}

fn has_crl(value: &Value) -> bool {
    let candidates = [
        value.get("extensions").and_then(|e| e.get("crlDistributionPoints")),
        value.get("crl_distribution_points"),
    ];
    candidates.into_iter().flatten().any(|v| match v {
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    })
}

/// A single certificate-update envelope consumed from the ingest client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateEvent {
    pub seen_at: String,
    #[serde(default = "default_issuer")]
    pub issuer_org: String,
    pub all_domains: Vec<String>,
    pub leaf_cert: Value,
}

fn default_issuer() -> String {
    "Unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cn_mismatch_false_when_cn_matches_san() {
        let leaf = LeafCert::from_value(&json!({
            "subject": {"CN": "example.com"},
            "extensions": {"subjectAltName": "DNS:example.com, DNS:www.example.com"}
        }));
        assert!(!leaf.cn_mismatch());
    }

    #[test]
    fn cn_mismatch_false_when_cn_empty() {
        let leaf = LeafCert::from_value(&json!({
            "subject": {"CN": ""},
            "extensions": {"subjectAltName": "DNS:example.com"}
        }));
        assert!(!leaf.cn_mismatch());
    }

    #[test]
    fn cn_mismatch_true_when_no_san_covers_cn() {
        let leaf = LeafCert::from_value(&json!({
            "subject": {"CN": "evil.example.com"},
            "extensions": {"subjectAltName": "DNS:example.com"}
        }));
        assert!(leaf.cn_mismatch());
    }

    #[test]
    fn wildcard_san_covers_cn() {
        let leaf = LeafCert::from_value(&json!({
            "subject": {"CN": "foo.example.com"},
            "extensions": {"subjectAltName": ["*.example.com"]}
        }));
        assert!(!leaf.cn_mismatch());
    }

    #[test]
    fn detects_ocsp_from_aia() {
        let leaf = LeafCert::from_value(&json!({
            "extensions": {"authorityInfoAccess": "OCSP - URI:http://ocsp.example.com"}
        }));
        assert!(leaf.has_revocation_info);
    }

    #[test]
    fn detects_crl_when_ocsp_absent() {
        let leaf = LeafCert::from_value(&json!({
            "extensions": {"crlDistributionPoints": ["http://crl.example.com/ca.crl"]}
        }));
        assert!(leaf.has_revocation_info);
    }

    #[test]
    fn missing_revocation_info() {
        let leaf = LeafCert::from_value(&json!({}));
        assert!(!leaf.has_revocation_info);
    }

    #[test]
    fn epoch_dates_parse() {
        let leaf = LeafCert::from_value(&json!({
            "not_before": 1_600_000_000,
            "not_after": 1_700_000_000
        }));
        assert!(leaf.not_before.is_some());
        assert!(leaf.not_after.is_some());
    }

    #[test]
    fn iso_dates_parse() {
        let leaf = LeafCert::from_value(&json!({
            "not_before": "2024-01-01T00:00:00",
            "not_after": "2024-06-01T12:30:00"
        }));
        assert!(leaf.not_before.is_some());
        assert!(leaf.not_after.is_some());
    }

    #[test]
    fn malformed_dates_are_none() {
        let leaf = LeafCert::from_value(&json!({
            "not_before": "not-a-date",
            "not_after": true
        }));
        assert!(leaf.not_before.is_none());
        assert!(leaf.not_after.is_none());
    }
}
