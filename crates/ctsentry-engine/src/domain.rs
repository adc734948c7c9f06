//! Domain validation (§4.3 step 1): rejects inputs that would be
//! malformed or abusive to send to the permutation service, and special-
//! cases IP literals (which have no typo-squat variants worth fetching).

use std::net::IpAddr;

const MAX_TOTAL_LEN: usize = 120;
const MAX_LABEL_LEN: usize = 63;
const MAX_LABEL_COUNT: usize = 10;

/// Outcome of validating a work item's domain before permutation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// An IP literal: treat the domain itself as the only candidate, skip
    /// permutation fetch entirely.
    IpLiteral,
    /// An ordinary DNS name that passed the structural checks.
    Domain,
    /// Malformed: too long, too many labels, or an illegal character.
    Invalid,
}

/// Classify `domain` per §4.3 step 1.
#[must_use]
pub fn validate(domain: &str) -> Validation {
    if domain.parse::<IpAddr>().is_ok() {
        return Validation::IpLiteral;
    }

    if domain.len() > MAX_TOTAL_LEN {
        return Validation::Invalid;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() > MAX_LABEL_COUNT {
        return Validation::Invalid;
    }

    for label in &labels {
        if label.len() > MAX_LABEL_LEN {
            return Validation::Invalid;
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Validation::Invalid;
        }
    }

    Validation::Domain
}
