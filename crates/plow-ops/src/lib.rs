//! # Plow Ops
//!
//! 業務操作層：每個操作包在單一交易內，出貨單狀態變動時呼叫對帳器。

pub mod activity;
pub mod bom;
pub mod inventory;
pub mod movements;
pub mod parts;
pub mod products;
pub mod shipments;

#[cfg(test)]
mod test_support;

use plow_cache::TtlCache;
use plow_core::{Database, LedgerConfig, Part};
use serde::Serialize;

// Re-export 主要類型
pub use activity::ActivityPage;
pub use parts::{PartQuery, PartRemoval, StockAdjustment};
pub use shipments::ShipmentResult;

/// 分頁結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// 從已排序的完整清單切出一頁（頁碼從 1 開始）
    pub fn paginate(all: Vec<T>, page: usize, per: usize) -> Self {
        let page = page.max(1);
        let per = per.max(1);
        let total_count = all.len();
        let total_pages = total_count.div_ceil(per).max(1);
        let items = all
            .into_iter()
            .skip((page - 1).saturating_mul(per))
            .take(per)
            .collect();

        Self {
            items,
            page,
            per,
            total_count,
            total_pages,
        }
    }
}

/// 業務服務
///
/// 持有資料庫、設定與零件搜尋緩存。
pub struct PlowService<D> {
    db: D,
    config: LedgerConfig,
    part_cache: TtlCache<PartQuery, Page<Part>>,
}

impl<D: Database> PlowService<D> {
    /// 創建新的服務
    pub fn new(db: D, config: LedgerConfig) -> Self {
        let part_cache = TtlCache::new(config.cache_ttl());
        Self {
            db,
            config,
            part_cache,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    /// 零件資料或庫存有變動時清除搜尋緩存
    fn invalidate_parts(&mut self) {
        if !self.part_cache.is_empty() {
            tracing::debug!("清除零件搜尋緩存（{} 筆）", self.part_cache.len());
        }
        self.part_cache.clear_all();
    }
}
