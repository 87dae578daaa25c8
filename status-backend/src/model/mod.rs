pub mod cache;
pub mod endpoint;
pub mod gatus;

pub use cache::ExpiringCache;
pub use endpoint::Endpoint;
