//! Parsing of raw `whois` stdout into a creation date.

use crate::error::{Result, WhoisError};
use chrono::{DateTime, TimeZone, Utc};

/// Find the first line carrying a creation date and return its raw value
/// (the text after the first colon, trimmed). Accepts `Creation Date:`
/// (case-sensitive, the common gTLD registry format) or `created:`
/// (case-insensitive, seen on several ccTLD registries).
fn find_creation_date_line(raw: &str) -> Option<&str> {
    raw.lines().find_map(|line| {
        let trimmed = line.trim();
        if trimmed.starts_with("Creation Date:") {
            trimmed.split_once(':').map(|(_, v)| v.trim())
        } else if trimmed.to_lowercase().starts_with("created:") {
            trimmed.split_once(':').map(|(_, v)| v.trim())
        } else {
            None
        }
    })
}

/// Parse a WHOIS creation-date value in `YYYY-MM-DDTHH:MM:SSZ` form.
fn parse_creation_date(raw: &str) -> Result<DateTime<Utc>> {
    let naive = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ")
        .map_err(|e| WhoisError::DateParse {
            raw: raw.to_string(),
            reason: e.to_string(),
        })?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Parse raw `whois` output into a registration age in days since
/// creation, measured against `now`. Returns an error (never panics) on
/// any malformed or missing data; the caller maps this to `-1`.
pub fn registration_age_days(domain: &str, raw: &str, now: DateTime<Utc>) -> Result<i64> {
    let creation_raw = find_creation_date_line(raw)
        .ok_or_else(|| WhoisError::NoCreationDate(domain.to_string()))?;
    let creation = parse_creation_date(creation_raw)?;
    Ok((now - creation).num_days())
}
