//! 記憶體資料庫
//!
//! 單一互斥鎖串行化所有交易；交易在快照上執行，成功後整體替換。

use chrono::{DateTime, Utc};
use plow_core::{
    ActivityLog, Bom, BomItem, BomKey, CatalogTx, Database, InventoryItem, InventoryKey,
    LedgerTx, MovementFilter, NewActivity, NewPart, NewPartMovement, NewShipment, Part,
    PartId, PartMovement, PlowError, PlowModel, Result, Shipment, ShipmentId,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// 自增序號
#[derive(Debug, Clone, Default)]
struct Sequences {
    part: i64,
    bom: i64,
    shipment: i64,
    movement: i64,
    activity: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

/// 資料表
#[derive(Debug, Clone, Default)]
struct Tables {
    parts: BTreeMap<PartId, Part>,
    boms: BTreeMap<BomKey, Bom>,
    inventory: BTreeMap<InventoryKey, InventoryItem>,
    shipments: BTreeMap<ShipmentId, Shipment>,
    movements: Vec<PartMovement>,
    activity: Vec<ActivityLog>,
    seq: Sequences,
}

/// 記憶體資料庫
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: Mutex<Tables>,
}

impl MemoryDatabase {
    /// 創建空資料庫
    pub fn new() -> Self {
        Self::default()
    }
}

impl Database for MemoryDatabase {
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn CatalogTx) -> Result<T>,
    {
        let mut guard = self
            .tables
            .lock()
            .map_err(|_| PlowError::Storage("資料庫鎖已損壞".to_string()))?;

        let mut tx = MemoryTx {
            tables: guard.clone(),
        };

        match f(&mut tx) {
            Ok(value) => {
                *guard = tx.tables;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!("交易回滾: {}", err);
                Err(err)
            }
        }
    }
}

/// 交易：持有資料表快照
pub struct MemoryTx {
    tables: Tables,
}

impl MemoryTx {
    fn part_mut(&mut self, part_id: PartId) -> Result<&mut Part> {
        self.tables
            .parts
            .get_mut(&part_id)
            .ok_or_else(|| PlowError::not_found("零件", part_id))
    }

    fn name_taken(&self, name: &str, except: Option<PartId>) -> bool {
        self.tables
            .parts
            .values()
            .any(|p| Some(p.id) != except && p.matches_name(name))
    }
}

impl LedgerTx for MemoryTx {
    fn find_boms(&self, keys: &[BomKey]) -> Result<Vec<Bom>> {
        Ok(keys
            .iter()
            .filter_map(|key| self.tables.boms.get(key).cloned())
            .collect())
    }

    fn find_parts_by_names(&self, names: &[String]) -> Result<Vec<Part>> {
        Ok(self
            .tables
            .parts
            .values()
            .filter(|part| names.iter().any(|name| part.matches_name(name)))
            .cloned()
            .collect())
    }

    fn shipment_movements(&self, shipment_id: ShipmentId) -> Result<Vec<PartMovement>> {
        Ok(self
            .tables
            .movements
            .iter()
            .filter(|m| m.shipment_id == Some(shipment_id) && m.reason.is_shipment())
            .cloned()
            .collect())
    }

    fn increment_part_stock(&mut self, part_id: PartId, delta: i64) -> Result<Part> {
        let part = self.part_mut(part_id)?;
        part.stock = part.stock.checked_add(delta).ok_or_else(|| {
            PlowError::Validation(format!("零件 {} 庫存調整 {} 超出範圍", part_id, delta))
        })?;
        part.updated_at = Utc::now();
        Ok(part.clone())
    }

    fn append_movement(&mut self, movement: NewPartMovement) -> Result<PartMovement> {
        if !self.tables.parts.contains_key(&movement.part_id) {
            return Err(PlowError::not_found("零件", movement.part_id));
        }
        let record = PartMovement {
            id: next(&mut self.tables.seq.movement),
            part_id: movement.part_id,
            delta: movement.delta,
            reason: movement.reason,
            shipment_id: movement.shipment_id,
            note: movement.note,
            created_at: Utc::now(),
        };
        self.tables.movements.push(record.clone());
        Ok(record)
    }
}

impl CatalogTx for MemoryTx {
    fn insert_part(&mut self, part: NewPart, default_unit: &str) -> Result<Part> {
        if self.name_taken(&part.name, None) {
            return Err(PlowError::Conflict(format!("零件名稱已存在: {}", part.name)));
        }
        let now = Utc::now();
        let record = Part {
            id: next(&mut self.tables.seq.part),
            name: part.name,
            stock: part.stock,
            unit: part.unit.unwrap_or_else(|| default_unit.to_string()),
            shop_name: part.shop_name,
            shop_url: part.shop_url,
            is_archived: false,
            created_at: now,
            updated_at: now,
        };
        self.tables.parts.insert(record.id, record.clone());
        Ok(record)
    }

    fn get_part(&self, part_id: PartId) -> Result<Option<Part>> {
        Ok(self.tables.parts.get(&part_id).cloned())
    }

    fn save_part(&mut self, mut part: Part) -> Result<Part> {
        if self.name_taken(&part.name, Some(part.id)) {
            return Err(PlowError::Conflict(format!("零件名稱已存在: {}", part.name)));
        }
        let existing = self.part_mut(part.id)?;
        part.created_at = existing.created_at;
        part.updated_at = Utc::now();
        *existing = part.clone();
        Ok(part)
    }

    fn delete_part(&mut self, part_id: PartId) -> Result<()> {
        self.tables
            .parts
            .remove(&part_id)
            .map(|_| ())
            .ok_or_else(|| PlowError::not_found("零件", part_id))
    }

    fn list_parts(&self) -> Result<Vec<Part>> {
        let mut parts: Vec<Part> = self.tables.parts.values().cloned().collect();
        parts.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(parts)
    }

    fn part_is_referenced(&self, part_id: PartId) -> Result<bool> {
        let in_bom = self.tables.boms.values().any(|bom| bom.references(part_id));
        let in_ledger = self.tables.movements.iter().any(|m| m.part_id == part_id);
        let in_extras = self
            .tables
            .shipments
            .values()
            .flat_map(|s| s.extras.iter())
            .any(|extra| extra.part_id == Some(part_id));
        Ok(in_bom || in_ledger || in_extras)
    }

    fn get_bom(&self, key: &BomKey) -> Result<Option<Bom>> {
        Ok(self.tables.boms.get(key).cloned())
    }

    fn replace_bom(&mut self, key: BomKey, items: Vec<BomItem>) -> Result<Bom> {
        if let Some(missing) = items
            .iter()
            .find(|item| !self.tables.parts.contains_key(&item.part_id))
        {
            return Err(PlowError::not_found("零件", missing.part_id));
        }
        let id = match self.tables.boms.get(&key) {
            Some(existing) => existing.id,
            None => next(&mut self.tables.seq.bom),
        };
        let bom = Bom {
            id,
            model_name: key.model_name.clone(),
            bom_type: key.bom_type,
            items,
        };
        self.tables.boms.insert(key, bom.clone());
        Ok(bom)
    }

    fn get_inventory(&self, key: &InventoryKey) -> Result<Option<InventoryItem>> {
        Ok(self.tables.inventory.get(key).cloned())
    }

    fn set_inventory(&mut self, key: InventoryKey, quantity: i64) -> Result<InventoryItem> {
        if quantity < 0 {
            return Err(PlowError::Storage(format!("成品庫存不可為負: {}", key)));
        }
        let item = self
            .tables
            .inventory
            .entry(key)
            .or_insert_with(|| InventoryItem::new(key, 0));
        item.quantity = quantity;
        Ok(item.clone())
    }

    fn list_inventory(&self) -> Result<Vec<InventoryItem>> {
        Ok(self.tables.inventory.values().cloned().collect())
    }

    fn ensure_inventory(&mut self, key: InventoryKey, is_manual: bool) -> Result<bool> {
        if self.tables.inventory.contains_key(&key) {
            return Ok(false);
        }
        let item = if is_manual {
            InventoryItem::manual(key)
        } else {
            InventoryItem::new(key, 0)
        };
        self.tables.inventory.insert(key, item);
        Ok(true)
    }

    fn delete_manual_inventory(&mut self, model: PlowModel, serial_number: i32) -> Result<usize> {
        let before = self.tables.inventory.len();
        self.tables.inventory.retain(|key, item| {
            !(item.is_manual && key.model == model && key.serial_number == serial_number)
        });
        Ok(before - self.tables.inventory.len())
    }

    fn insert_shipment(&mut self, shipment: NewShipment) -> Result<Shipment> {
        let now = Utc::now();
        let record = Shipment {
            id: next(&mut self.tables.seq.shipment),
            customer: shipment.customer,
            notes: shipment.notes,
            status: shipment.status.unwrap_or_default(),
            items: shipment.items,
            extras: shipment.extras,
            created_at: now,
            updated_at: now,
        };
        self.tables.shipments.insert(record.id, record.clone());
        Ok(record)
    }

    fn get_shipment(&self, shipment_id: ShipmentId) -> Result<Option<Shipment>> {
        Ok(self.tables.shipments.get(&shipment_id).cloned())
    }

    fn save_shipment(&mut self, mut shipment: Shipment) -> Result<Shipment> {
        let existing = self
            .tables
            .shipments
            .get_mut(&shipment.id)
            .ok_or_else(|| PlowError::not_found("出貨單", shipment.id))?;
        shipment.created_at = existing.created_at;
        shipment.updated_at = Utc::now();
        *existing = shipment.clone();
        Ok(shipment)
    }

    fn delete_shipment(&mut self, shipment_id: ShipmentId) -> Result<()> {
        self.tables
            .shipments
            .remove(&shipment_id)
            .map(|_| ())
            .ok_or_else(|| PlowError::not_found("出貨單", shipment_id))
    }

    fn list_shipments(&self) -> Result<Vec<Shipment>> {
        let mut shipments: Vec<Shipment> = self.tables.shipments.values().cloned().collect();
        shipments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(shipments)
    }

    fn list_movements(&self, filter: &MovementFilter) -> Result<Vec<PartMovement>> {
        let mut movements: Vec<PartMovement> = self
            .tables
            .movements
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        movements.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(movements)
    }

    fn append_activity(&mut self, activity: NewActivity) -> Result<ActivityLog> {
        let record = ActivityLog {
            id: next(&mut self.tables.seq.activity),
            kind: activity.kind,
            entity_type: activity.entity_type,
            entity_id: activity.entity_id,
            summary: activity.summary,
            meta: activity.meta,
            created_at: Utc::now(),
        };
        self.tables.activity.push(record.clone());
        Ok(record)
    }

    fn list_activity(&self) -> Result<Vec<ActivityLog>> {
        let mut logs = self.tables.activity.clone();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(logs)
    }

    fn delete_activity_before(&mut self, cutoff: DateTime<Utc>) -> Result<usize> {
        let before = self.tables.activity.len();
        self.tables.activity.retain(|log| log.created_at >= cutoff);
        Ok(before - self.tables.activity.len())
    }
}
