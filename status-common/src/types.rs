use serde::{Deserialize, Serialize};

/// Content type every catalog entry and detail is published as.
pub const CATALOG_ITEM_TYPE: &str = "tv";

/// One tile in the catalog grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Detailed metadata for a single catalog entry (the `meta` resource).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<CatalogItem> for Detail {
    fn from(item: CatalogItem) -> Self {
        Self {
            id: item.id,
            item_type: item.item_type,
            name: item.name,
            poster: item.poster,
            description: item.description,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamBehaviorHints {
    pub not_web_ready: bool,
}

/// Entry shown when the user opens a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub behavior_hints: StreamBehaviorHints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub metas: Vec<CatalogItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailResponse {
    pub meta: Detail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamsResponse {
    pub streams: Vec<StreamEntry>,
}

/// A resource declared in the manifest: either a bare name or a
/// name restricted to some types and id prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManifestResource {
    Named(String),
    Scoped {
        name: String,
        types: Vec<String>,
        #[serde(rename = "idPrefixes")]
        id_prefixes: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDescriptor {
    #[serde(rename = "type")]
    pub catalog_type: String,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestBehaviorHints {
    pub configurable: bool,
    pub configuration_required: bool,
}

/// Addon manifest describing capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub resources: Vec<ManifestResource>,
    pub types: Vec<String>,
    pub catalogs: Vec<CatalogDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_prefixes: Option<Vec<String>>,
    #[serde(default)]
    pub behavior_hints: ManifestBehaviorHints,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_item_serializes_type_field() {
        let item = CatalogItem {
            id: "stremio-status:core_api".to_string(),
            item_type: CATALOG_ITEM_TYPE.to_string(),
            name: "⛔ API".to_string(),
            poster: None,
            description: Some("down".to_string()),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "tv");
        assert!(json.get("poster").is_none());
        assert_eq!(json["description"], "down");
    }

    #[test]
    fn test_stream_entry_uses_camel_case_hints() {
        let stream = StreamEntry {
            name: "✅ API".to_string(),
            description: None,
            url: "http://localhost:7000".to_string(),
            behavior_hints: StreamBehaviorHints { not_web_ready: true },
        };
        let json = serde_json::to_value(&stream).unwrap();
        assert_eq!(json["behaviorHints"]["notWebReady"], true);
    }

    #[test]
    fn test_manifest_resources_mix_named_and_scoped() {
        let resources = vec![
            ManifestResource::Named("catalog".to_string()),
            ManifestResource::Scoped {
                name: "meta".to_string(),
                types: vec!["tv".to_string()],
                id_prefixes: vec!["stremio-status:".to_string()],
            },
        ];
        let json = serde_json::to_value(&resources).unwrap();
        assert_eq!(json[0], "catalog");
        assert_eq!(json[1]["idPrefixes"][0], "stremio-status:");
    }
}
