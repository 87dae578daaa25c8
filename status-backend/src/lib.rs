//! Stremio addon presenting health-check results from a Gatus monitor as a
//! browsable catalog, filtered per user.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod module;
pub mod server;
