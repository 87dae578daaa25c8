//! Addon-selection and health filters, and how each view combines them.

use super::user_config::{AddonSelection, UserConfig};
use crate::model::Endpoint;

/// The three shapes the same snapshot is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Catalog,
    Detail,
    Stream,
}

impl View {
    /// Only the stream view hides healthy endpoints. The catalog always shows
    /// the full grid, and detail must resolve anything the catalog shows.
    pub fn applies_health_filter(self) -> bool {
        matches!(self, View::Stream)
    }
}

pub fn filter_by_addon_selection<'a>(
    endpoints: impl IntoIterator<Item = &'a Endpoint>,
    selection: &AddonSelection,
) -> Vec<&'a Endpoint> {
    match selection {
        AddonSelection::All => endpoints.into_iter().collect(),
        AddonSelection::Nothing => Vec::new(),
        AddonSelection::Only(wanted) => endpoints
            .into_iter()
            .filter(|ep| {
                wanted.contains(&ep.key.to_lowercase()) || wanted.contains(&ep.name.to_lowercase())
            })
            .collect(),
    }
}

pub fn filter_by_health<'a>(endpoints: Vec<&'a Endpoint>, only_down: bool) -> Vec<&'a Endpoint> {
    if !only_down {
        return endpoints;
    }
    endpoints.into_iter().filter(|ep| !ep.healthy).collect()
}

/// Apply the filter combination `view` calls for.
pub fn filter_for_view<'a>(
    endpoints: &'a [Endpoint],
    config: &UserConfig,
    view: View,
) -> Vec<&'a Endpoint> {
    let selected = filter_by_addon_selection(endpoints, &config.addons);
    if view.applies_health_filter() {
        filter_by_health(selected, config.only_down)
    } else {
        selected
    }
}
