//! # Plow Ledger
//!
//! 零件帳本對帳引擎：由出貨明細計算 BOM 需求量，與已套用的異動比對後
//! 只套用差額，讓狀態切換可以重複執行而不會重複扣料。

pub mod apply;
pub mod bom_lookup;
pub mod delta;
pub mod reconciler;
pub mod summary;

#[cfg(test)]
mod test_support;

use plow_core::{BomKey, PartId, PlowError, Result, ShipmentStatus};
use serde::Serialize;
use std::collections::BTreeMap;

// Re-export 主要類型
pub use apply::apply_shipment_part_deltas;
pub use bom_lookup::required_bom_keys;
pub use delta::{applied_by_part, calculate_shipment_delta, diff_requirements};
pub use reconciler::Reconciler;
pub use summary::build_parts_summary;

/// 零件 ID → 數量
pub type PartQuantities = BTreeMap<PartId, i64>;

/// 需求彙總結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartsSummary {
    /// 每個零件的總需求量
    pub required_by_part_id: PartQuantities,

    /// 找不到的 BOM（不阻擋出貨流程）
    pub missing_bom: Vec<BomKey>,

    /// 無法對應到零件的額外零件名稱
    pub unmatched_extras: Vec<String>,
}

impl PartsSummary {
    /// 是否有任何需要提醒使用者的缺口
    pub fn has_gaps(&self) -> bool {
        !self.missing_bom.is_empty() || !self.unmatched_extras.is_empty()
    }

    /// 記錄缺少的 BOM（去重，保留首次出現順序）
    pub fn add_missing_bom(&mut self, key: BomKey) {
        if !self.missing_bom.contains(&key) {
            self.missing_bom.push(key);
        }
    }

    /// 累加需求量，溢位時回傳驗證錯誤
    pub fn add_requirement(&mut self, part_id: PartId, quantity: i64) -> Result<()> {
        let total = self.required_by_part_id.entry(part_id).or_insert(0);
        *total = total
            .checked_add(quantity)
            .ok_or_else(|| PlowError::Validation(format!("零件 {} 需求量超出範圍", part_id)))?;
        Ok(())
    }
}

/// 負庫存警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockWarning {
    pub part_id: PartId,
    pub name: String,
    pub stock: i64,
}

impl StockWarning {
    pub fn new(part_id: PartId, name: String, stock: i64) -> Self {
        Self {
            part_id,
            name,
            stock,
        }
    }
}

/// 單次對帳結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    /// 對帳時依據的狀態
    pub status: ShipmentStatus,

    /// 需求彙總；RESERVED 與 SENT 不計算
    pub summary: Option<PartsSummary>,

    /// 實際套用的差額
    pub delta: PartQuantities,

    /// 負庫存警告
    pub warnings: Vec<StockWarning>,
}

impl ReconcileOutcome {
    /// 不做任何庫存處理的結果
    pub fn untouched(status: ShipmentStatus) -> Self {
        Self {
            status,
            summary: None,
            delta: PartQuantities::new(),
            warnings: Vec::new(),
        }
    }

    /// 是否有庫存變動
    pub fn changed_stock(&self) -> bool {
        !self.delta.is_empty()
    }
}
