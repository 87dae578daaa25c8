//! Wire types shared by the status addon: the manifest and the
//! catalog / meta / stream payloads a Stremio client consumes.

pub mod types;

pub use types::*;
