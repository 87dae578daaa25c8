use serde::{Deserialize, Serialize};

/// Canonical health state of one monitored addon.
///
/// Built once per successful fetch and never mutated afterwards. `key` is
/// expected to be unique within a snapshot but duplicates are tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub key: String,
    pub name: String,
    pub group: String,
    pub healthy: bool,
    pub response_time_ms: Option<i64>,
    /// Opaque upstream timestamp of the most recent check.
    pub last_updated: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let ep = Endpoint {
            key: "core_torrentio".to_string(),
            name: "Torrentio".to_string(),
            group: "core".to_string(),
            healthy: true,
            response_time_ms: Some(12),
            last_updated: None,
        };
        let json = serde_json::to_value(&ep).unwrap();
        assert_eq!(json["responseTimeMs"], 12);
        assert!(json["lastUpdated"].is_null());
    }
}
