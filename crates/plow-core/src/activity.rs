//! 操作紀錄（定期清理，與異動帳本分開）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::bom::BomKey;
use crate::shipment::{Shipment, ShipmentStatus};
use crate::{ActivityId, PartId, ShipmentId};

/// 操作紀錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: ActivityId,
    /// 事件類型，例如 "shipment.status"
    pub kind: String,
    pub entity_type: String,
    pub entity_id: String,
    pub summary: String,
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    /// 關鍵字查詢（不分大小寫，比對摘要、類型與實體）
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.summary, &self.kind, &self.entity_type, &self.entity_id]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// 待寫入的操作紀錄
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub kind: String,
    pub entity_type: String,
    pub entity_id: String,
    pub summary: String,
    pub meta: serde_json::Value,
}

impl NewActivity {
    pub fn new(
        kind: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: impl ToString,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            entity_type: entity_type.into(),
            entity_id: entity_id.to_string(),
            summary: summary.into(),
            meta: serde_json::Value::Null,
        }
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = meta;
        self
    }

    pub fn shipment_created(shipment: &Shipment) -> Self {
        Self::new(
            "shipment.create",
            "Shipment",
            shipment.id,
            format!(
                "Shipment {} created for {}",
                shipment.id, shipment.customer.company_name
            ),
        )
        .with_meta(json!({
            "shipmentId": shipment.id,
            "status": shipment.status,
            "companyName": shipment.customer.company_name,
            "itemsCount": shipment.items.len(),
            "extrasCount": shipment.extras.len(),
        }))
    }

    pub fn shipment_status(shipment_id: ShipmentId, from: ShipmentStatus, to: ShipmentStatus) -> Self {
        Self::new(
            "shipment.status",
            "Shipment",
            shipment_id,
            format!("Shipment {} status {} -> {}", shipment_id, from, to),
        )
        .with_meta(json!({
            "shipmentId": shipment_id,
            "fromStatus": from,
            "toStatus": to,
        }))
    }

    pub fn shipment_deleted(shipment: &Shipment) -> Self {
        Self::new(
            "shipment.delete",
            "Shipment",
            shipment.id,
            format!(
                "Shipment {} deleted ({})",
                shipment.id, shipment.customer.company_name
            ),
        )
        .with_meta(json!({
            "shipmentId": shipment.id,
            "companyName": shipment.customer.company_name,
            "itemsCount": shipment.items.len(),
            "extrasCount": shipment.extras.len(),
        }))
    }

    pub fn bom_replaced(key: &BomKey, item_count: usize) -> Self {
        Self::new(
            "bom.replace",
            "Bom",
            key,
            format!("BOM {} replaced with {} items", key, item_count),
        )
        .with_meta(json!({
            "modelName": key.model_name,
            "bomType": key.bom_type,
            "itemsCount": item_count,
        }))
    }

    pub fn part_adjusted(part_id: PartId, delta: i64, stock: i64) -> Self {
        Self::new(
            "part.adjust",
            "Part",
            part_id,
            format!("Part {} stock {:+} -> {}", part_id, delta, stock),
        )
        .with_meta(json!({ "partId": part_id, "delta": delta, "stock": stock }))
    }
}
