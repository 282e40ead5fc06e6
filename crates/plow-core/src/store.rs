//! 儲存層介面
//!
//! 所有寫入都在 [`Database::transaction`] 內完成；閉包回傳 `Err` 時整筆交易回滾。

use chrono::{DateTime, Utc};

use crate::activity::{ActivityLog, NewActivity};
use crate::bom::{Bom, BomItem, BomKey};
use crate::inventory::{InventoryItem, InventoryKey};
use crate::movement::{MovementFilter, NewPartMovement, PartMovement};
use crate::part::{NewPart, Part};
use crate::shipment::{NewShipment, PlowModel, Shipment};
use crate::{PartId, Result, ShipmentId};

/// 對帳器在交易內需要的存取
pub trait LedgerTx {
    /// 批次查詢 BOM；不存在的鍵直接略過
    fn find_boms(&self, keys: &[BomKey]) -> Result<Vec<Bom>>;

    /// 依名稱查詢零件（不分大小寫、完全相同）
    fn find_parts_by_names(&self, names: &[String]) -> Result<Vec<Part>>;

    /// 出貨單的對帳異動（READY_SHIPMENT / ROLLBACK_SHIPMENT）
    fn shipment_movements(&self, shipment_id: ShipmentId) -> Result<Vec<PartMovement>>;

    /// 遞增零件庫存，回傳更新後的零件
    fn increment_part_stock(&mut self, part_id: PartId, delta: i64) -> Result<Part>;

    /// 寫入一筆異動
    fn append_movement(&mut self, movement: NewPartMovement) -> Result<PartMovement>;
}

/// 操作層在交易內需要的完整存取
pub trait CatalogTx: LedgerTx {
    // 零件
    fn insert_part(&mut self, part: NewPart, default_unit: &str) -> Result<Part>;
    fn get_part(&self, part_id: PartId) -> Result<Option<Part>>;
    fn save_part(&mut self, part: Part) -> Result<Part>;
    fn delete_part(&mut self, part_id: PartId) -> Result<()>;
    fn list_parts(&self) -> Result<Vec<Part>>;
    /// 是否被 BOM、異動或出貨額外零件引用
    fn part_is_referenced(&self, part_id: PartId) -> Result<bool>;

    // BOM
    fn get_bom(&self, key: &BomKey) -> Result<Option<Bom>>;
    /// 整批替換：表頭 upsert，明細全刪後依序重建
    fn replace_bom(&mut self, key: BomKey, items: Vec<BomItem>) -> Result<Bom>;

    // 成品庫存
    fn get_inventory(&self, key: &InventoryKey) -> Result<Option<InventoryItem>>;
    fn set_inventory(&mut self, key: InventoryKey, quantity: i64) -> Result<InventoryItem>;
    fn list_inventory(&self) -> Result<Vec<InventoryItem>>;
    /// 不存在才建立數量 0 的列；回傳是否新建
    fn ensure_inventory(&mut self, key: InventoryKey, is_manual: bool) -> Result<bool>;
    /// 刪除該型號序號下所有手動列；回傳刪除筆數
    fn delete_manual_inventory(&mut self, model: PlowModel, serial_number: i32) -> Result<usize>;

    // 出貨單
    fn insert_shipment(&mut self, shipment: NewShipment) -> Result<Shipment>;
    fn get_shipment(&self, shipment_id: ShipmentId) -> Result<Option<Shipment>>;
    fn save_shipment(&mut self, shipment: Shipment) -> Result<Shipment>;
    fn delete_shipment(&mut self, shipment_id: ShipmentId) -> Result<()>;
    fn list_shipments(&self) -> Result<Vec<Shipment>>;

    // 異動帳本
    fn list_movements(&self, filter: &MovementFilter) -> Result<Vec<PartMovement>>;

    // 操作紀錄
    fn append_activity(&mut self, activity: NewActivity) -> Result<ActivityLog>;
    fn list_activity(&self) -> Result<Vec<ActivityLog>>;
    fn delete_activity_before(&mut self, cutoff: DateTime<Utc>) -> Result<usize>;
}

/// 資料庫：提供交易邊界
pub trait Database {
    /// 在單一交易中執行 `f`；`Ok` 提交，`Err` 回滾
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn CatalogTx) -> Result<T>;
}
