//! # Plow Cache
//!
//! 可注入的 TTL 緩存

pub mod ttl;

// Re-export 主要類型
pub use ttl::TtlCache;
