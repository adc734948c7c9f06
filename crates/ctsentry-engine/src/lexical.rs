//! Lexical feature extractors over the raw candidate domain string
//! (§4.4.3): entropy, suspicious keyword/TLD membership, and brand
//! mentions hiding in a subdomain.

use std::collections::HashSet;

/// Shannon entropy of `s`, base 2, rounded to 2 decimals (§3, `entropy`).
#[must_use]
pub fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut counts: std::collections::HashMap<char, u32> = std::collections::HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }

    let len = s.chars().count() as f64;
    let entropy = counts
        .values()
        .map(|&count| {
            let p = f64::from(count) / len;
            -p * p.log2()
        })
        .sum::<f64>();

    (entropy * 100.0).round() / 100.0
}

/// The label after the last `.`, or the whole string if there is no `.`.
#[must_use]
pub fn tld(domain: &str) -> String {
    domain.rsplit('.').next().unwrap_or(domain).to_lowercase()
}

/// True iff `tld` is a member of the configured suspicious-TLD set.
#[must_use]
pub fn tld_suspicious(domain: &str, suspicious_tlds: &HashSet<String>) -> bool {
    suspicious_tlds.contains(&tld(domain))
}

/// True iff any configured suspicious keyword appears as a substring of
/// the lowercased domain.
#[must_use]
pub fn has_keyword(domain: &str, keywords: &HashSet<String>) -> bool {
    let lower = domain.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw.as_str()))
}

/// True iff any brand name (case-insensitive) appears as a substring of
/// the part of the domain before the eTLD+1 — i.e. everything but the
/// last two labels, which is a reasonable eTLD+1 approximation absent a
/// public-suffix list (§4.4.3).
#[must_use]
pub fn brand_in_subdomain<'a>(domain: &str, brands: impl Iterator<Item = &'a str>) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 3 {
        return false;
    }

    let subdomain = labels[..labels.len() - 2].join(".").to_lowercase();
    brands.map(str::to_lowercase).any(|brand| subdomain.contains(&brand))
}
