//! The alert record written to the output sink.

use crate::types::feature::FeatureVector;

/// Canonical header row, written exactly once per output file.
pub const CSV_HEADER: &[&str] = &[
    "timestamp",
    "domain",
    "brand_match",
    "similarity_score",
    "issuer",
    "tld",
    "tld_suspicious",
    "has_keyword",
    "entropy",
    "registration_days",
    "cn_mismatch",
    "ocsp_missing",
    "short_lived",
    "brand_in_subdomain",
    "score",
];

/// One scored phishing-candidate alert, ready for the log writer.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    pub seen_at: String,
    pub domain: String,
    pub brand_match: String,
    pub issuer_org: String,
    pub features: FeatureVector,
    pub score: f64,
}

/// Render a bool as the canonical `True`/`False` token the downstream
/// analyzer expects (not Rust's lowercase `Display`).
fn py_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

impl AlertRecord {
    /// Render this alert as a CSV row matching [`CSV_HEADER`] exactly.
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.seen_at.clone(),
            self.domain.clone(),
            self.brand_match.clone(),
            format!("{:.2}", self.features.similarity_score),
            self.issuer_org.clone(),
            self.features.tld.clone(),
            py_bool(self.features.tld_suspicious).to_string(),
            py_bool(self.features.has_keyword).to_string(),
            format!("{:.2}", self.features.entropy),
            self.features.registration_days.to_string(),
            py_bool(self.features.cn_mismatch).to_string(),
            py_bool(self.features.ocsp_missing).to_string(),
            py_bool(self.features.short_lived).to_string(),
            py_bool(self.features.brand_in_subdomain).to_string(),
            format!("{:.2}", self.score),
        ]
    }

    /// The deduplication key for `seen_alerts`.
    #[must_use]
    pub fn dedup_key(&self) -> (String, String) {
        (self.domain.clone(), self.brand_match.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_features() -> FeatureVector {
        FeatureVector {
            tld: "com".to_string(),
            tld_suspicious: false,
            has_keyword: false,
            entropy: 3.14159,
            cn_mismatch: false,
            ocsp_missing: true,
            short_lived: false,
            brand_in_subdomain: false,
            similarity_score: 0.956,
            registration_days: -1,
        }
    }

    #[test]
    fn row_has_header_length() {
        let alert = AlertRecord {
            seen_at: "2024-01-01T00:00:00".to_string(),
            domain: "gooogle.com".to_string(),
            brand_match: "google.com".to_string(),
            issuer_org: "Let's Encrypt".to_string(),
            features: sample_features(),
            score: 6.0,
        };
        let row = alert.to_row();
        assert_eq!(row.len(), CSV_HEADER.len());
        assert_eq!(row[2], "google.com");
        assert_eq!(row[3], "0.96");
        assert_eq!(row[9], "-1");
        assert_eq!(row[10], "False");
        assert_eq!(row[11], "True");
        assert_eq!(row[14], "6.00");
    }

    #[test]
    fn dedup_key_is_domain_brand_pair() {
        let alert = AlertRecord {
            seen_at: "t".to_string(),
            domain: "d.com".to_string(),
            brand_match: "b.com".to_string(),
            issuer_org: "Unknown".to_string(),
            features: sample_features(),
            score: 1.0,
        };
        assert_eq!(alert.dedup_key(), ("d.com".to_string(), "b.com".to_string()));
    }
}
