//! # plowstock
//!
//! 雪鏟出貨與零件庫存帳本。
//!
//! - [`plow_core`]：資料模型、錯誤、設定與儲存介面
//! - [`plow_ledger`]：出貨狀態對帳
//! - [`plow_store`]：記憶體交易式資料庫
//! - [`plow_cache`]：TTL 緩存
//! - [`plow_ops`]：業務操作

pub use plow_cache;
pub use plow_core;
pub use plow_ledger;
pub use plow_ops;
pub use plow_store;

pub use plow_core::{LedgerConfig, PlowError, Result};
pub use plow_ops::PlowService;
pub use plow_store::MemoryDatabase;

/// 以記憶體資料庫建立服務
pub fn memory_service(config: LedgerConfig) -> PlowService<MemoryDatabase> {
    PlowService::new(MemoryDatabase::new(), config)
}
