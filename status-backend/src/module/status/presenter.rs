//! Ordering and human-readable rendering of endpoints.
//!
//! Everything here is a pure function of its inputs; functions that depend
//! on the current time have an `_at` variant taking `now` explicitly.

use chrono::{DateTime, Utc};
use serde::Serialize;
use status_common::{CatalogItem, Detail, StreamBehaviorHints, StreamEntry, CATALOG_ITEM_TYPE};

use crate::model::Endpoint;

/// Namespace prepended to endpoint keys to form catalog ids.
pub const ID_PREFIX: &str = "stremio-status:";

/// Bump when the poster images change so clients refetch them.
pub const POSTER_VERSION: &str = "2";

pub const GLYPH_UP: &str = "✅";
pub const GLYPH_DOWN: &str = "⛔";
pub const GLYPH_MIXED: &str = "⚠️";

const DESCRIPTION_HEADER: &str = "[Stremio Status]";

/// Unhealthy first, then by name ignoring case. Stable for equal names.
pub fn sort_endpoints(endpoints: &mut [&Endpoint]) {
    endpoints.sort_by_cached_key(|ep| (ep.healthy, ep.name.to_lowercase()));
}

pub fn status_glyph(healthy: bool) -> &'static str {
    if healthy { GLYPH_UP } else { GLYPH_DOWN }
}

/// Parse an ISO-8601 timestamp carrying an offset (`Z` or `±hh:mm`).
fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp)
        .or_else(|_| DateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn format_relative_time(timestamp: Option<&str>) -> String {
    format_relative_time_at(timestamp, Utc::now())
}

/// "42s ago", "3m ago", "5h ago", "2d ago"; "just now" for future
/// timestamps, "unknown" when absent, and the input verbatim when it
/// cannot be parsed.
pub fn format_relative_time_at(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(timestamp) = timestamp.filter(|ts| !ts.is_empty()) else {
        return "unknown".to_string();
    };
    let Some(checked_at) = parse_timestamp(timestamp) else {
        return timestamp.to_string();
    };

    let seconds = (now - checked_at).num_seconds();
    match seconds {
        s if s < 0 => "just now".to_string(),
        s if s < 60 => format!("{}s ago", s),
        s if s < 3600 => format!("{}m ago", s / 60),
        s if s < 86400 => format!("{}h ago", s / 3600),
        s => format!("{}d ago", s / 86400),
    }
}

pub fn describe_endpoint(endpoint: &Endpoint) -> String {
    describe_endpoint_at(endpoint, Utc::now())
}

pub fn describe_endpoint_at(endpoint: &Endpoint, now: DateTime<Utc>) -> String {
    let status = if endpoint.healthy { "Up" } else { "Down" };
    let latency = endpoint
        .response_time_ms
        .map(|ms| format!("{}ms", ms))
        .unwrap_or_else(|| "n/a".to_string());
    let last_check = format_relative_time_at(endpoint.last_updated.as_deref(), now);

    format!(
        "{}\nStatus: {}\nLatency: {}\nLast Check: {}",
        DESCRIPTION_HEADER, status, latency, last_check
    )
}

/// Overall health of a set of endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub glyph: &'static str,
    pub status: String,
    pub total: usize,
    pub last_check: String,
}

pub fn summarize(endpoints: &[Endpoint]) -> StatusSummary {
    summarize_at(endpoints, Utc::now())
}

pub fn summarize_at(endpoints: &[Endpoint], now: DateTime<Utc>) -> StatusSummary {
    let total = endpoints.len();
    let down = endpoints.iter().filter(|ep| !ep.healthy).count();

    let (glyph, status) = if down == 0 {
        (GLYPH_UP, "All operational".to_string())
    } else if down == total {
        (GLYPH_DOWN, "All down".to_string())
    } else {
        (GLYPH_MIXED, format!("{} down, {} up", down, total - down))
    };

    // Parseable timestamps beat unparseable ones; ties fall back to text order.
    let most_recent = endpoints
        .iter()
        .filter_map(|ep| ep.last_updated.as_deref())
        .filter(|ts| !ts.is_empty())
        .max_by_key(|ts| (parse_timestamp(ts), *ts));

    StatusSummary {
        glyph,
        status,
        total,
        last_check: format_relative_time_at(most_recent, now),
    }
}

pub fn describe_summary(summary: &StatusSummary) -> String {
    let plural = if summary.total == 1 { "" } else { "s" };
    format!(
        "{}\nMonitoring: {} addon{}\nStatus: {}\nLast Check: {}",
        DESCRIPTION_HEADER, summary.total, plural, summary.status, summary.last_check
    )
}

/// Renders endpoints into the addon protocol shapes.
#[derive(Debug, Clone)]
pub struct Presenter {
    public_base_url: String,
}

impl Presenter {
    pub fn new(public_base_url: &str) -> Self {
        Self {
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn poster_url(&self, healthy: bool) -> String {
        let file = if healthy { "up.png" } else { "down.png" };
        format!("{}/static/{}?v={}", self.public_base_url, file, POSTER_VERSION)
    }

    fn display_name(endpoint: &Endpoint) -> String {
        format!("{} {}", status_glyph(endpoint.healthy), endpoint.name)
    }

    pub fn catalog_item(&self, endpoint: &Endpoint) -> CatalogItem {
        CatalogItem {
            id: format!("{}{}", ID_PREFIX, endpoint.key),
            item_type: CATALOG_ITEM_TYPE.to_string(),
            name: Self::display_name(endpoint),
            poster: Some(self.poster_url(endpoint.healthy)),
            description: Some(describe_endpoint(endpoint)),
        }
    }

    pub fn detail(&self, endpoint: &Endpoint) -> Detail {
        self.catalog_item(endpoint).into()
    }

    pub fn stream_entry(&self, endpoint: &Endpoint) -> StreamEntry {
        StreamEntry {
            name: Self::display_name(endpoint),
            description: Some(describe_endpoint(endpoint)),
            url: self.public_base_url.clone(),
            behavior_hints: StreamBehaviorHints { not_web_ready: true },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ep(name: &str, healthy: bool, last_updated: Option<&str>) -> Endpoint {
        Endpoint {
            key: format!("addons_{}", name.to_lowercase()),
            name: name.to_string(),
            group: "addons".to_string(),
            healthy,
            response_time_ms: None,
            last_updated: last_updated.map(str::to_string),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sort_unhealthy_first_then_name() {
        let endpoints = vec![ep("b", true, None), ep("A", false, None), ep("a", false, None)];
        let mut refs: Vec<&Endpoint> = endpoints.iter().collect();
        sort_endpoints(&mut refs);

        let order: Vec<(&str, bool)> = refs.iter().map(|e| (e.name.as_str(), e.healthy)).collect();
        // "A" and "a" tie; the stable sort keeps input order.
        assert_eq!(order, [("A", false), ("a", false), ("b", true)]);
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let endpoints = vec![ep("zeta", false, None), ep("Alpha", false, None), ep("beta", true, None)];
        let mut refs: Vec<&Endpoint> = endpoints.iter().collect();
        sort_endpoints(&mut refs);
        let names: Vec<&str> = refs.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "zeta", "beta"]);
    }

    #[test]
    fn test_relative_time_buckets() {
        let at = |ts: &str| format_relative_time_at(Some(ts), now());
        assert_eq!(at("2026-10-17T12:00:05Z"), "just now");
        assert_eq!(at("2026-10-17T12:00:00Z"), "0s ago");
        assert_eq!(at("2026-10-17T11:59:01Z"), "59s ago");
        assert_eq!(at("2026-10-17T11:59:00Z"), "1m ago");
        assert_eq!(at("2026-10-17T11:00:01Z"), "59m ago");
        assert_eq!(at("2026-10-17T11:00:00Z"), "1h ago");
        assert_eq!(at("2026-10-16T12:00:01Z"), "23h ago");
        assert_eq!(at("2026-10-14T11:00:00Z"), "3d ago");
        assert_eq!(at("2026-10-17T13:59:30+02:00"), "30s ago");
        assert_eq!(at("2026-10-17 11:58:00.250+00:00"), "1m ago");
    }

    #[test]
    fn test_relative_time_absent_and_unparseable() {
        assert_eq!(format_relative_time_at(None, now()), "unknown");
        assert_eq!(format_relative_time_at(Some(""), now()), "unknown");
        assert_eq!(format_relative_time_at(Some("yesterday-ish"), now()), "yesterday-ish");
        // No offset: cannot be compared against UTC, returned as-is.
        assert_eq!(
            format_relative_time_at(Some("2026-10-17T11:00:00"), now()),
            "2026-10-17T11:00:00"
        );
    }

    #[test]
    fn test_describe_endpoint() {
        let mut endpoint = ep("Torrentio", false, Some("2026-10-17T11:58:00Z"));
        endpoint.response_time_ms = Some(250);
        assert_eq!(
            describe_endpoint_at(&endpoint, now()),
            "[Stremio Status]\nStatus: Down\nLatency: 250ms\nLast Check: 2m ago"
        );

        let healthy = ep("Cinemeta", true, None);
        assert_eq!(
            describe_endpoint_at(&healthy, now()),
            "[Stremio Status]\nStatus: Up\nLatency: n/a\nLast Check: unknown"
        );
    }

    #[test]
    fn test_summary_classification() {
        let all_up = summarize_at(&[ep("a", true, None), ep("b", true, None)], now());
        assert_eq!((all_up.glyph, all_up.status.as_str(), all_up.total), (GLYPH_UP, "All operational", 2));
        assert_eq!(all_up.last_check, "unknown");

        let mixed = summarize_at(
            &[ep("a", false, None), ep("b", true, None), ep("c", false, None)],
            now(),
        );
        assert_eq!((mixed.glyph, mixed.status.as_str()), (GLYPH_MIXED, "2 down, 1 up"));

        let all_down = summarize_at(&[ep("a", false, None)], now());
        assert_eq!((all_down.glyph, all_down.status.as_str()), (GLYPH_DOWN, "All down"));

        let empty = summarize_at(&[], now());
        assert_eq!((empty.glyph, empty.total), (GLYPH_UP, 0));
    }

    #[test]
    fn test_summary_uses_most_recent_check() {
        let summary = summarize_at(
            &[
                ep("a", true, Some("2026-10-17T11:00:00Z")),
                ep("b", true, Some("2026-10-17T13:50:00+02:00")),
                ep("c", true, Some("garbage")),
                ep("d", true, None),
            ],
            now(),
        );
        assert_eq!(summary.last_check, "10m ago");

        let unparseable = summarize_at(&[ep("a", true, Some("x")), ep("b", true, Some("y"))], now());
        assert_eq!(unparseable.last_check, "y");
    }

    #[test]
    fn test_describe_summary_pluralizes() {
        let one = summarize_at(&[ep("a", true, None)], now());
        assert_eq!(
            describe_summary(&one),
            "[Stremio Status]\nMonitoring: 1 addon\nStatus: All operational\nLast Check: unknown"
        );
        let two = summarize_at(&[ep("a", true, None), ep("b", false, None)], now());
        assert!(describe_summary(&two).contains("Monitoring: 2 addons"));
    }

    #[test]
    fn test_presenter_shapes() {
        let presenter = Presenter::new("https://status.example.com/");
        assert_eq!(presenter.poster_url(true), "https://status.example.com/static/up.png?v=2");
        assert_eq!(presenter.poster_url(false), "https://status.example.com/static/down.png?v=2");

        let endpoint = ep("Torrentio", false, None);
        let item = presenter.catalog_item(&endpoint);
        assert_eq!(item.id, "stremio-status:addons_torrentio");
        assert_eq!(item.item_type, "tv");
        assert_eq!(item.name, "⛔ Torrentio");
        assert_eq!(item.poster.as_deref(), Some("https://status.example.com/static/down.png?v=2"));

        let detail = presenter.detail(&endpoint);
        assert_eq!(detail.id, item.id);
        assert_eq!(detail.name, item.name);

        let stream = presenter.stream_entry(&ep("Cinemeta", true, None));
        assert_eq!(stream.name, "✅ Cinemeta");
        assert_eq!(stream.url, "https://status.example.com");
        assert!(stream.behavior_hints.not_web_ready);
    }
}
