//! Phishing score computation (§4.4.5): an additive rubric over the
//! feature vector, clamped to `[0, 10]`.
//!
//! Scoring is intentionally pure and free of I/O so it can be exercised
//! directly against the end-to-end scenarios in the specification's
//! testable-properties section.

use ctsentry_core::FeatureVector;

const ISSUERS_OF_INTEREST: &[&str] = &["ZeroSSL", "Let's Encrypt", "Actalis S.p.A."];

fn entropy_points(entropy: f64) -> f64 {
    if entropy >= 3.7 {
        3.0
    } else if entropy >= 3.4 {
        2.0
    } else if entropy >= 3.1 {
        1.0
    } else {
        0.0
    }
}

fn registration_points(days: i64) -> f64 {
    if days < 0 {
        0.0
    } else if days < 14 {
        3.0
    } else if days < 60 {
        2.0
    } else if days < 180 {
        1.0
    } else {
        0.0
    }
}

fn similarity_points(similarity: f64) -> f64 {
    if similarity >= 0.90 {
        1.0
    } else if similarity >= 0.85 {
        0.75
    } else if similarity >= 0.80 {
        0.5
    } else {
        0.0
    }
}

fn issuer_points(issuer_org: &str) -> f64 {
    if ISSUERS_OF_INTEREST.contains(&issuer_org) {
        1.0
    } else {
        0.0
    }
}

/// Compute the phishing score for a scored candidate: additive points
/// per the §4.4.5 rubric, clamped to `[0, 10]` and rounded to 2 decimals
/// (round-half-away-from-zero, per DESIGN.md's Open Question decision).
#[must_use]
pub fn score(features: &FeatureVector, issuer_org: &str) -> f64 {
    let mut total = 0.0;
    total += entropy_points(features.entropy);
    total += if features.has_keyword { 2.0 } else { 0.0 };
    total += if features.tld_suspicious { 1.0 } else { 0.0 };
    total += issuer_points(issuer_org);
    total += if features.cn_mismatch { 1.5 } else { 0.0 };
    total += if features.ocsp_missing { 1.5 } else { 0.0 };
    total += if features.short_lived { 1.5 } else { 0.0 };
    total += if features.brand_in_subdomain { 1.0 } else { 0.0 };
    total += registration_points(features.registration_days);
    total += similarity_points(features.similarity_score);

    let clamped = total.clamp(0.0, 10.0);
    (clamped * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_features() -> FeatureVector {
        FeatureVector {
            tld: "com".to_string(),
            tld_suspicious: false,
            has_keyword: false,
            entropy: 0.0,
            cn_mismatch: false,
            ocsp_missing: false,
            short_lived: false,
            brand_in_subdomain: false,
            similarity_score: 0.0,
            registration_days: -1,
        }
    }

    #[test]
    fn scenario_s2_typo_squat_alert() {
        let features = FeatureVector {
            entropy: 3.1,
            registration_days: 3,
            similarity_score: 0.95,
            ..base_features()
        };
        assert!((score(&features, "Let's Encrypt") - 6.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_s4_brand_in_subdomain_adds_expected_points() {
        let with = FeatureVector {
            has_keyword: true,
            tld_suspicious: true,
            brand_in_subdomain: true,
            ..base_features()
        };
        let without = base_features();
        assert!(score(&with, "Unknown") - score(&without, "Unknown") >= 1.0 + 2.0 + 1.0 - 1e-9);
    }

    #[test]
    fn score_is_clamped_to_ten() {
        let maxed = FeatureVector {
            entropy: 5.0,
            has_keyword: true,
            tld_suspicious: true,
            cn_mismatch: true,
            ocsp_missing: true,
            short_lived: true,
            brand_in_subdomain: true,
            registration_days: 1,
            similarity_score: 0.99,
            ..base_features()
        };
        assert_eq!(score(&maxed, "ZeroSSL"), 10.0);
    }

    #[test]
    fn unknown_registration_contributes_zero() {
        let unknown = FeatureVector {
            registration_days: -1,
            ..base_features()
        };
        let none_at_all = FeatureVector {
            registration_days: 400,
            ..base_features()
        };
        assert!((score(&unknown, "Unknown") - score(&none_at_all, "Unknown")).abs() < 1e-9);
    }

    #[test]
    fn score_is_monotonic_in_each_boolean_signal() {
        let base = base_features();
        let flips = [
            FeatureVector { has_keyword: true, ..base.clone() },
            FeatureVector { tld_suspicious: true, ..base.clone() },
            FeatureVector { cn_mismatch: true, ..base.clone() },
            FeatureVector { ocsp_missing: true, ..base.clone() },
            FeatureVector { short_lived: true, ..base.clone() },
            FeatureVector { brand_in_subdomain: true, ..base.clone() },
        ];
        for flipped in flips {
            assert!(score(&flipped, "Unknown") >= score(&base, "Unknown"));
        }
    }

    #[test]
    fn score_is_monotonic_in_similarity_bands() {
        let mut prev = 0.0;
        for similarity in [0.0, 0.80, 0.85, 0.90] {
            let features = FeatureVector { similarity_score: similarity, ..base_features() };
            let s = score(&features, "Unknown");
            assert!(s >= prev);
            prev = s;
        }
    }
}
