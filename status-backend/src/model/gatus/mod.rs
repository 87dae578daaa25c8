//! Gatus health monitor integration
//!
//! Fetches `/api/v1/endpoints/statuses` and turns each raw record into the
//! canonical [`Endpoint`](crate::model::Endpoint).

pub mod types;
pub mod api_client;
pub mod normalizer;

pub use types::{RawCheckResult, RawEndpointStatus};
pub use api_client::{GatusClient, StatusSource};
pub use normalizer::{derive_key, normalize};
