//! Assembles the full [`FeatureVector`] for one scored candidate (§3,
//! §4.4.4), combining lexical signals, the normalized leaf certificate,
//! and the WHOIS-derived registration age.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use ctsentry_core::{FeatureVector, LeafCert};

use crate::lexical;

const SHORT_LIVED_THRESHOLD_DAYS: i64 = 30;

/// Build the feature vector for `candidate`, given the certificate
/// carried by its originating work item and the already-computed brand
/// similarity and registration age.
#[must_use]
pub fn extract<'a>(
    candidate: &str,
    leaf: &LeafCert,
    similarity_score: f64,
    registration_days: i64,
    suspicious_tlds: &HashSet<String>,
    keywords: &HashSet<String>,
    brands: impl Iterator<Item = &'a str>,
    now: DateTime<Utc>,
) -> FeatureVector {
    let short_lived = leaf
        .remaining_validity_days(now)
        .is_some_and(|days| days <= SHORT_LIVED_THRESHOLD_DAYS);

    FeatureVector {
        tld: lexical::tld(candidate),
        tld_suspicious: lexical::tld_suspicious(candidate, suspicious_tlds),
        has_keyword: lexical::has_keyword(candidate, keywords),
        entropy: lexical::shannon_entropy(candidate),
        cn_mismatch: leaf.cn_mismatch(),
        ocsp_missing: !leaf.has_revocation_info,
        short_lived,
        brand_in_subdomain: lexical::brand_in_subdomain(candidate, brands),
        similarity_score,
        registration_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn keyword_set() -> HashSet<String> {
        ["login", "secure"].iter().map(|s| (*s).to_string()).collect()
    }

    fn tld_set() -> HashSet<String> {
        ["xyz"].iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn short_lived_true_within_thirty_days() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let leaf = LeafCert::from_value(&json!({
            "not_before": "2023-12-01T00:00:00",
            "not_after": "2024-01-10T00:00:00"
        }));
        let features = extract(
            "secure-login.example.xyz",
            &leaf,
            0.9,
            5,
            &tld_set(),
            &keyword_set(),
            vec!["example"].into_iter(),
            now,
        );
        assert!(features.short_lived);
        assert!(features.has_keyword);
        assert!(features.tld_suspicious);
        assert_eq!(features.tld, "xyz");
    }

    #[test]
    fn malformed_dates_yield_not_short_lived() {
        let leaf = LeafCert::from_value(&json!({"not_before": true, "not_after": "garbage"}));
        let features = extract(
            "example.com",
            &leaf,
            0.0,
            -1,
            &HashSet::new(),
            &HashSet::new(),
            std::iter::empty(),
            Utc::now(),
        );
        assert!(!features.short_lived);
    }
}
