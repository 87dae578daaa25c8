use std::sync::Arc;
use std::time::Duration;

use status_common::{CatalogItem, Detail, StreamEntry};

use super::filter::{filter_for_view, View};
use super::presenter::{self, Presenter, StatusSummary, ID_PREFIX};
use super::provider::{Snapshot, SnapshotProvider};
use super::user_config::UserConfig;
use crate::model::gatus::StatusSource;

/// Entry points of the status pipeline: snapshot → filter → sort → render.
///
/// Constructed once at startup and shared by reference between requests.
pub struct StatusService {
    provider: SnapshotProvider,
    presenter: Presenter,
}

impl StatusService {
    pub fn new(source: Arc<dyn StatusSource>, cache_ttl: Duration, presenter: Presenter) -> Self {
        Self {
            provider: SnapshotProvider::new(source, cache_ttl),
            presenter,
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.provider.snapshot().await
    }

    /// Every selected addon, up or down, regardless of `only_down`.
    pub async fn build_catalog(&self, config: &UserConfig) -> Vec<CatalogItem> {
        let snapshot = self.snapshot().await;
        let mut endpoints = filter_for_view(&snapshot, config, View::Catalog);
        presenter::sort_endpoints(&mut endpoints);
        endpoints
            .into_iter()
            .map(|ep| self.presenter.catalog_item(ep))
            .collect()
    }

    /// Look up one selected addon by catalog id (prefix optional), key or name.
    /// `None` means not found.
    pub async fn build_detail(&self, id: &str, config: &UserConfig) -> Option<Detail> {
        let snapshot = self.snapshot().await;
        let wanted = id.strip_prefix(ID_PREFIX).unwrap_or(id);
        filter_for_view(&snapshot, config, View::Detail)
            .into_iter()
            .find(|ep| ep.key == wanted || ep.name == wanted)
            .map(|ep| self.presenter.detail(ep))
    }

    /// Selected addons, restricted to unhealthy ones when `only_down` is set.
    pub async fn build_streams(&self, config: &UserConfig) -> Vec<StreamEntry> {
        let snapshot = self.snapshot().await;
        let mut endpoints = filter_for_view(&snapshot, config, View::Stream);
        presenter::sort_endpoints(&mut endpoints);
        endpoints
            .into_iter()
            .map(|ep| self.presenter.stream_entry(ep))
            .collect()
    }

    /// Overall health across the whole snapshot.
    pub async fn summary(&self) -> StatusSummary {
        presenter::summarize(&self.snapshot().await)
    }
}
