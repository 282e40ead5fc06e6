//! 成品庫存模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shipment::{PlowModel, ShipmentItem, Variant};

/// 成品庫存鍵：型號 + 序號 + 外觀 + 是否 Schwenkbock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InventoryKey {
    pub model: PlowModel,
    pub serial_number: i32,
    pub variant: Variant,
    pub is_schwenkbock: bool,
}

impl InventoryKey {
    pub fn new(model: PlowModel, serial_number: i32, variant: Variant, is_schwenkbock: bool) -> Self {
        Self {
            model,
            serial_number,
            variant,
            is_schwenkbock,
        }
    }

    /// 依出貨明細彙總每個庫存鍵的數量
    pub fn totals<'a>(items: impl IntoIterator<Item = &'a ShipmentItem>) -> BTreeMap<InventoryKey, i64> {
        let mut totals = BTreeMap::new();
        for item in items {
            let total = totals.entry(item.inventory_key()).or_insert(0i64);
            *total = total.saturating_add(item.quantity);
        }
        totals
    }
}

/// 出廠即有的型號與序號
pub const FIXED_PRODUCTS: [(PlowModel, i32); 6] = [
    (PlowModel::Fl640, 2901),
    (PlowModel::Fl540, 2716),
    (PlowModel::Fl470, 2404),
    (PlowModel::Fl400, 1801),
    (PlowModel::Fl340, 1403),
    (PlowModel::Fl260, 1203),
];

/// 產品：型號 + 序號，涵蓋四種外觀與擺動座組合
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Product {
    pub model: PlowModel,
    pub serial_number: i32,
    pub is_manual: bool,
}

impl Product {
    pub fn new(model: PlowModel, serial_number: i32, is_manual: bool) -> Self {
        Self {
            model,
            serial_number,
            is_manual,
        }
    }

    /// 產品的四個庫存鍵
    pub fn inventory_keys(&self) -> [InventoryKey; 4] {
        [
            InventoryKey::new(self.model, self.serial_number, Variant::Zinc, false),
            InventoryKey::new(self.model, self.serial_number, Variant::Orange, false),
            InventoryKey::new(self.model, self.serial_number, Variant::Zinc, true),
            InventoryKey::new(self.model, self.serial_number, Variant::Orange, true),
        ]
    }
}

impl std::fmt::Display for InventoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{:?}-{}",
            self.model.display_name(),
            self.serial_number,
            self.variant,
            if self.is_schwenkbock { "S" } else { "N" }
        )
    }
}

/// 成品庫存
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub key: InventoryKey,
    pub quantity: i64,
    /// 手動登記的產品；固定產品不可刪除
    pub is_manual: bool,
}

impl InventoryItem {
    pub fn new(key: InventoryKey, quantity: i64) -> Self {
        Self {
            key,
            quantity,
            is_manual: false,
        }
    }

    /// 手動登記的空庫存列
    pub fn manual(key: InventoryKey) -> Self {
        Self {
            key,
            quantity: 0,
            is_manual: true,
        }
    }

    /// 檢查是否足夠出貨
    pub fn can_supply(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}
