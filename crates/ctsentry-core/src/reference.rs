//! Shared, read-only reference data: the brand list and the built-in
//! suspicious-TLD, suspicious-keyword, and false-positive sets.
//!
//! These are loaded once at startup and never mutated afterwards, so no
//! locking is required for readers (§5 of the design).

use crate::error::{CoreError, Result};
use std::collections::HashSet;
use std::path::Path;

/// Ordered list of brand domains to match candidates against. Order
/// matters: `is_similar` returns the *first* qualifying brand, so the
/// list's order is a deterministic tie-break.
#[derive(Debug, Clone, Default)]
pub struct BrandList {
    brands: Vec<String>,
}

impl BrandList {
    /// Load brand domains from a text file, one per line, blanks skipped.
    /// Missing file or an empty list are both fatal (§7 taxonomy #5):
    /// without brands the detector has nothing to compare against.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::BrandList {
            path: path.display().to_string(),
            source,
        })?;

        let brands: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        if brands.is_empty() {
            return Err(CoreError::EmptyBrandList {
                path: path.display().to_string(),
            });
        }

        Ok(Self { brands })
    }

    #[must_use]
    pub fn from_vec(brands: Vec<String>) -> Self {
        Self { brands }
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.brands.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.brands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

/// Suspicious-keyword set used by the lexical feature extractor.
/// Fixed by the specification (§4.4.3), not operator-configurable.
pub const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "login", "verify", "secure", "update", "account", "signin", "password", "auth", "bank", "pay",
    "confirm", "reset", "validate", "webmail", "support", "unlock", "user", "invoice",
];

/// Built-in suspicious-TLD set. The source data had two variants: one
/// where adjacent string literals were silently concatenated by a missing
/// comma (e.g. `"cfd" "click"` -> `"cfdclick"`), and one with every token
/// separate. This fixes the bug and keeps every token separate (see
/// DESIGN.md, Open Question 1).
pub const DEFAULT_SUSPICIOUS_TLDS: &[&str] = &[
    "xyz", "top", "buzz", "shop", "online", "click", "link", "support", "help", "fit", "club",
    "live", "life", "host", "press", "work", "today", "site", "website", "space", "rest", "fail",
    "gdn", "uno", "trade",
];

/// AWS regional S3 website endpoints, appended to the false-positive set.
const AWS_S3_REGIONAL_ENDPOINTS: &[&str] = &[
    "s3.amazonaws.com",
    "s3-external-1.amazonaws.com",
    "s3.us-east-2.amazonaws.com",
    "s3.us-west-1.amazonaws.com",
    "s3.us-west-2.amazonaws.com",
    "s3.af-south-1.amazonaws.com",
    "s3.ap-east-1.amazonaws.com",
    "s3.ap-south-1.amazonaws.com",
    "s3.ap-northeast-1.amazonaws.com",
    "s3.ap-northeast-2.amazonaws.com",
    "s3.ap-northeast-3.amazonaws.com",
    "s3.ap-southeast-1.amazonaws.com",
    "s3.ap-southeast-2.amazonaws.com",
    "s3.ca-central-1.amazonaws.com",
    "s3.eu-central-1.amazonaws.com",
    "s3.eu-west-1.amazonaws.com",
    "s3.eu-west-2.amazonaws.com",
    "s3.eu-west-3.amazonaws.com",
    "s3.eu-north-1.amazonaws.com",
    "s3.eu-south-1.amazonaws.com",
    "s3.me-south-1.amazonaws.com",
    "s3.sa-east-1.amazonaws.com",
];

/// Built-in false-positive substring list: common cloud/CDN/hosting
/// suffixes that legitimately produce high brand-similarity scores
/// without being phishing (e.g. `mybucket.s3.amazonaws.com`).
pub fn default_false_positive_patterns() -> Vec<String> {
    let mut patterns: Vec<String> = vec![
        "cloudfront.net",
        "github.io",
        "gitlab.io",
        "firebaseapp.com",
        "azurewebsites.net",
        "fastly.net",
        "herokuapp.com",
        "vercel.app",
        "netlify.app",
        "pages.dev",
        "wordpress.com",
        "blogspot.com",
        "automattic.com",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    patterns.extend(AWS_S3_REGIONAL_ENDPOINTS.iter().map(|s| (*s).to_string()));
    patterns
}

/// Load a newline-delimited set file, falling back to `default` when the
/// path is `None` or does not exist. Unlike the brand list, these are
/// genuinely optional heuristics (DESIGN.md, Open Question 5).
pub fn load_set_or_default(path: Option<&Path>, default: &[&str]) -> HashSet<String> {
    if let Some(path) = path {
        if let Ok(content) = std::fs::read_to_string(path) {
            let set: HashSet<String> = content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_lowercase)
                .collect();
            if !set.is_empty() {
                return set;
            }
        }
    }
    default.iter().map(|s| (*s).to_string()).collect()
}

pub fn load_list_or_default(path: Option<&Path>, default: Vec<String>) -> Vec<String> {
    if let Some(path) = path {
        if let Ok(content) = std::fs::read_to_string(path) {
            let list: Vec<String> = content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_lowercase)
                .collect();
            if !list.is_empty() {
                return list;
            }
        }
    }
    default
}
