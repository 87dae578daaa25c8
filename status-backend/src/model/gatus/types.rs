//! Raw shapes returned by the Gatus statuses API.
//!
//! Every field is optional here; [`normalize`](super::normalize) is the one
//! place that decides what a missing value means.

use serde::Deserialize;
use serde_json::Value;

/// One check result. Gatus reports `duration` in nanoseconds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCheckResult {
    #[serde(default)]
    pub success: Option<Value>,
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One monitored endpoint as listed by the statuses API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEndpointStatus {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    /// Oldest first; the last element is the most recent check.
    #[serde(default)]
    pub results: Option<Vec<RawCheckResult>>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}
