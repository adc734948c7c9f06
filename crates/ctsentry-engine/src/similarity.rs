//! Brand similarity screening (§4.4.1, §4.4.2): `is_similar` and the
//! false-positive filter that suppresses legitimate cloud/CDN hosts that
//! would otherwise score high on lexical similarity to a brand.

use ctsentry_core::BrandList;

/// Result of screening a candidate domain against the brand list.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
    pub brand: String,
    pub similarity: f64,
}

/// True iff `domain` (already lowercased) contains any configured
/// false-positive substring.
#[must_use]
pub fn is_false_positive(domain_lower: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| domain_lower.contains(p.as_str()))
}

/// Screen `domain` against the brand list in list order, returning the
/// first brand whose normalized edit-similarity meets `threshold`,
/// provided the strings differ and the domain isn't a known false
/// positive. Brand list order is the deterministic tie-break (§4.4.1).
#[must_use]
pub fn is_similar(
    domain: &str,
    brands: &BrandList,
    threshold: f64,
    fp_patterns: &[String],
) -> Option<SimilarityMatch> {
    let domain_lower = domain.to_lowercase();

    if is_false_positive(&domain_lower, fp_patterns) {
        return None;
    }

    for brand in brands.iter() {
        let brand_lower = brand.to_lowercase();
        if domain_lower == brand_lower {
            continue;
        }

        let similarity = strsim::normalized_levenshtein(&domain_lower, &brand_lower);
        if similarity >= threshold {
            return Some(SimilarityMatch {
                brand: brand.to_string(),
                similarity,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brands(names: &[&str]) -> BrandList {
        BrandList::from_vec(names.iter().map(|s| (*s).to_string()).collect())
    }

    #[test]
    fn identical_strings_never_match() {
        let result = is_similar("google.com", &brands(&["google.com"]), 0.8, &[]);
        assert!(result.is_none());
    }

    #[test]
    fn typo_squat_matches_first_qualifying_brand() {
        let result = is_similar("gooogle.com", &brands(&["google.com"]), 0.8, &[]).unwrap();
        assert_eq!(result.brand, "google.com");
        assert!(result.similarity >= 0.8);
    }

    #[test]
    fn tie_break_is_first_brand_in_list_order() {
        // Both "aaaa.com" and "aaab.com" are within threshold of "aaac.com";
        // the first one in list order wins.
        let result = is_similar(
            "aaac.com",
            &brands(&["aaaa.com", "aaab.com"]),
            0.5,
            &[],
        )
        .unwrap();
        assert_eq!(result.brand, "aaaa.com");
    }

    #[test]
    fn known_false_positive_is_never_suspicious() {
        let fp = vec!["s3.amazonaws.com".to_string()];
        let result = is_similar(
            "mybucket.s3.amazonaws.com",
            &brands(&["mybucket"]),
            0.1,
            &fp,
        );
        assert!(result.is_none());
    }

    #[test]
    fn below_threshold_returns_none() {
        let result = is_similar("totally-different.net", &brands(&["google.com"]), 0.8, &[]);
        assert!(result.is_none());
    }
}
