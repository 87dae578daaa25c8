//! Addon status pipeline
//!
//! ## Flow
//! - `SnapshotProvider`: cached upstream snapshot, normalized into `Endpoint`s
//! - `filter`: per-user addon selection and health filters, combined per view
//! - `presenter`: ordering and rendering into catalog / detail / stream shapes
//! - `StatusService`: the entry points used by the HTTP layer

pub mod filter;
pub mod presenter;
pub mod provider;
pub mod service;
pub mod user_config;

pub use filter::View;
pub use presenter::{Presenter, StatusSummary, ID_PREFIX};
pub use provider::{Snapshot, SnapshotProvider};
pub use service::StatusService;
pub use user_config::{decode_config, AddonSelection, UserConfig};
