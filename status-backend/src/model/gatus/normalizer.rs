use serde_json::Value;

use super::types::{RawCheckResult, RawEndpointStatus};
use crate::model::Endpoint;

const NANOS_PER_MILLI: i64 = 1_000_000;

/// Turn one raw status record into the canonical [`Endpoint`].
///
/// The most recent (last) check result is authoritative. A record without
/// results is reported as unhealthy with no latency and no timestamp.
pub fn normalize(raw: RawEndpointStatus) -> Endpoint {
    let key = derive_key(&raw);
    let latest = raw.results.as_deref().and_then(<[RawCheckResult]>::last);

    let (healthy, response_time_ms, last_updated) = match latest {
        Some(result) => (
            result.success.as_ref().is_some_and(is_truthy),
            result.duration.as_ref().and_then(nanos_to_millis),
            non_empty(&result.timestamp)
                .or_else(|| non_empty(&raw.last_updated))
                .or_else(|| non_empty(&raw.time)),
        ),
        None => (false, None, None),
    };

    Endpoint {
        key,
        name: raw.name.unwrap_or_default(),
        group: raw.group.unwrap_or_default(),
        healthy,
        response_time_ms,
        last_updated,
    }
}

/// Use the upstream key when present, else `{group}_{name}` with every
/// `/` and space replaced by `-`.
pub fn derive_key(raw: &RawEndpointStatus) -> String {
    if let Some(key) = raw.key.as_deref().filter(|k| !k.is_empty()) {
        return key.to_string();
    }
    let group = url_safe(raw.group.as_deref().unwrap_or_default());
    let name = url_safe(raw.name.as_deref().unwrap_or_default());
    format!("{}_{}", group, name)
}

fn url_safe(s: &str) -> String {
    s.replace(['/', ' '], "-")
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

fn nanos_to_millis(duration: &Value) -> Option<i64> {
    let Value::Number(n) = duration else {
        return None;
    };
    if let Some(nanos) = n.as_i64() {
        return Some(nanos.div_euclid(NANOS_PER_MILLI));
    }
    n.as_f64()
        .map(|nanos| (nanos / NANOS_PER_MILLI as f64).floor() as i64)
}

/// JSON truthiness: false, null, zero, and empty strings/arrays/objects are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
