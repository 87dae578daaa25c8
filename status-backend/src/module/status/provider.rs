use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::model::gatus::{normalize, StatusSource};
use crate::model::{Endpoint, ExpiringCache};

/// Sentinel key of the single cache slot.
const SNAPSHOT_KEY: &str = "endpoints";

/// The most recent known health state, shared between requests.
pub type Snapshot = Arc<Vec<Endpoint>>;

/// Serves the current snapshot from cache, fetching on miss or expiry.
///
/// Successful fetches are cached for the TTL; failures are not, so the next
/// request retries straight away. Concurrent misses are not de-duplicated.
pub struct SnapshotProvider {
    source: Arc<dyn StatusSource>,
    cache: Mutex<ExpiringCache<&'static str, Snapshot>>,
}

impl SnapshotProvider {
    pub fn new(source: Arc<dyn StatusSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: Mutex::new(ExpiringCache::new(ttl)),
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        let cached = self.cache.lock().await.get(SNAPSHOT_KEY);
        if let Some(snapshot) = cached {
            debug!("Returning cached snapshot ({} endpoints)", snapshot.len());
            return snapshot;
        }

        debug!("Snapshot missing or expired, fetching from upstream");
        match self.source.fetch_statuses().await {
            Ok(statuses) => {
                let snapshot: Snapshot = Arc::new(statuses.into_iter().map(normalize).collect());
                self.cache.lock().await.set(SNAPSHOT_KEY, snapshot.clone());
                info!("Cached snapshot of {} endpoints", snapshot.len());
                snapshot
            }
            Err(e) => {
                error!("Failed to fetch endpoint statuses: {}", e);
                Arc::new(Vec::new())
            }
        }
    }
}
