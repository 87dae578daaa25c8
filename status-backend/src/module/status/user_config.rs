//! Per-request user configuration and its token decoder.
//!
//! The token is base64url-encoded JSON produced by the configurator page,
//! e.g. `{"addons": ["torrentio"], "onlyDown": false}`.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde::Deserialize;
use std::collections::HashSet;

use crate::error::ConfigDecodeError;

/// URL-safe alphabet, padding optional.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Which addons a user wants to see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AddonSelection {
    /// No `addons` list given.
    #[default]
    All,
    /// An explicitly empty list.
    Nothing,
    /// Lower-cased selectors, matched against endpoint key or name.
    Only(HashSet<String>),
}

impl AddonSelection {
    pub fn from_selectors<I, S>(selectors: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(selectors) = selectors else {
            return Self::All;
        };
        let wanted: HashSet<String> = selectors
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();
        if wanted.is_empty() {
            Self::Nothing
        } else {
            Self::Only(wanted)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUserConfig {
    #[serde(default)]
    addons: Option<Vec<String>>,
    #[serde(default = "default_only_down")]
    only_down: bool,
    #[serde(default, alias = "hideStatusCatalog")]
    hide_addon_status_catalog: bool,
}

fn default_only_down() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawUserConfig")]
pub struct UserConfig {
    pub addons: AddonSelection,
    /// Hide healthy endpoints from the stream view.
    pub only_down: bool,
    /// Presentation hint for the configurator; the pipeline ignores it.
    pub hide_status_catalog: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            addons: AddonSelection::All,
            only_down: default_only_down(),
            hide_status_catalog: false,
        }
    }
}

impl From<RawUserConfig> for UserConfig {
    fn from(raw: RawUserConfig) -> Self {
        Self {
            addons: AddonSelection::from_selectors(raw.addons),
            only_down: raw.only_down,
            hide_status_catalog: raw.hide_addon_status_catalog,
        }
    }
}

impl UserConfig {
    pub fn try_decode(token: &str) -> Result<Self, ConfigDecodeError> {
        // Accept the standard alphabet too.
        let token: String = token
            .trim()
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                other => other,
            })
            .collect();
        let bytes = TOKEN_ENGINE.decode(token.as_bytes())?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Decode a configuration token, falling back to the default on any error.
pub fn decode_config(token: &str) -> UserConfig {
    match UserConfig::try_decode(token) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid config token: {}", e);
            UserConfig::default()
        }
    }
}
