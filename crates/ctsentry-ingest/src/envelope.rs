//! Parsing of raw certstream-style JSON envelopes into [`WorkItem`]s.

use ctsentry_core::WorkItem;
use serde_json::Value;

const DEFAULT_ISSUER_ORG: &str = "Unknown";

/// Parse one raw WebSocket text frame into zero or more work items.
/// Returns `None` for anything that is not a `certificate_update`
/// envelope (including malformed JSON), which the caller logs and skips.
#[must_use]
pub fn parse_envelope(raw: &str) -> Option<Vec<WorkItem>> {
    let value: Value = serde_json::from_str(raw).ok()?;
    parse_value(&value)
}

/// Parse an already-decoded JSON envelope. Lets the caller distinguish
/// "not valid JSON at all" from "valid JSON we don't care about".
#[must_use]
pub fn parse_value(value: &Value) -> Option<Vec<WorkItem>> {
    if value.get("message_type")?.as_str()? != "certificate_update" {
        return None;
    }

    let data = value.get("data")?;
    let leaf_cert = data.get("leaf_cert").cloned().unwrap_or(Value::Null);

    let all_domains: Vec<String> = leaf_cert
        .get("all_domains")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    if all_domains.is_empty() {
        return Some(Vec::new());
    }

    let issuer_org = leaf_cert
        .get("issuer")
        .and_then(|i| i.get("O"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ISSUER_ORG)
        .to_string();

    let seen_at = data
        .get("seen")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default();

    Some(WorkItem::expand(&all_domains, &issuer_org, &seen_at, &leaf_cert))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ignores_non_certificate_update_messages() {
        let raw = json!({"message_type": "heartbeat"}).to_string();
        assert!(parse_envelope(&raw).is_none());
    }

    #[test]
    fn ignores_malformed_json() {
        assert!(parse_envelope("{not json").is_none());
    }

    #[test]
    fn parses_certificate_update_into_work_items() {
        let raw = json!({
            "message_type": "certificate_update",
            "data": {
                "seen": "2024-01-01T00:00:00",
                "leaf_cert": {
                    "all_domains": ["*.example.com", "login.example.com"],
                    "issuer": {"O": "Let's Encrypt"},
                }
            }
        })
        .to_string();

        let items = parse_envelope(&raw).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].domain, "example.com");
        assert_eq!(items[1].domain, "login.example.com");
        assert!(items.iter().all(|i| i.issuer_org == "Let's Encrypt"));
    }

    #[test]
    fn missing_issuer_org_defaults_to_unknown() {
        let raw = json!({
            "message_type": "certificate_update",
            "data": {
                "seen": "2024-01-01T00:00:00",
                "leaf_cert": {"all_domains": ["example.com"]}
            }
        })
        .to_string();

        let items = parse_envelope(&raw).unwrap();
        assert_eq!(items[0].issuer_org, "Unknown");
    }

    #[test]
    fn empty_domain_list_yields_empty_items() {
        let raw = json!({
            "message_type": "certificate_update",
            "data": {"seen": "2024-01-01T00:00:00", "leaf_cert": {}}
        })
        .to_string();

        assert_eq!(parse_envelope(&raw).unwrap().len(), 0);
    }
}
