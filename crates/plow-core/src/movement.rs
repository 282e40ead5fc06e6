//! 零件庫存異動（只增不改的帳本）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MovementId, PartId, ShipmentId};

/// 異動原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementReason {
    /// 手動調整
    ManualAdjust,
    /// 出貨備妥扣料
    ReadyShipment,
    /// 出貨回沖
    RollbackShipment,
}

impl MovementReason {
    /// 是否為出貨對帳產生的異動
    pub fn is_shipment(&self) -> bool {
        matches!(
            self,
            MovementReason::ReadyShipment | MovementReason::RollbackShipment
        )
    }

    /// 依差額方向決定出貨異動原因
    pub fn for_shipment_delta(delta: i64) -> Self {
        if delta < 0 {
            MovementReason::ReadyShipment
        } else {
            MovementReason::RollbackShipment
        }
    }
}

/// 庫存異動紀錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartMovement {
    pub id: MovementId,
    pub part_id: PartId,
    pub delta: i64,
    pub reason: MovementReason,
    pub shipment_id: Option<ShipmentId>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 待寫入的異動
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPartMovement {
    pub part_id: PartId,
    pub delta: i64,
    pub reason: MovementReason,
    pub shipment_id: Option<ShipmentId>,
    pub note: Option<String>,
}

impl NewPartMovement {
    /// 手動調整
    pub fn manual(part_id: PartId, delta: i64, note: Option<String>) -> Self {
        Self {
            part_id,
            delta,
            reason: MovementReason::ManualAdjust,
            shipment_id: None,
            note,
        }
    }

    /// 出貨對帳異動，原因由差額方向決定
    pub fn shipment(part_id: PartId, delta: i64, shipment_id: ShipmentId) -> Self {
        Self {
            part_id,
            delta,
            reason: MovementReason::for_shipment_delta(delta),
            shipment_id: Some(shipment_id),
            note: None,
        }
    }
}

/// 異動查詢條件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementFilter {
    pub reason: Option<MovementReason>,
    pub shipment_id: Option<ShipmentId>,
    pub part_id: Option<PartId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl MovementFilter {
    /// 只看某出貨單的對帳異動
    pub fn for_shipment(shipment_id: ShipmentId) -> Self {
        Self {
            shipment_id: Some(shipment_id),
            ..Default::default()
        }
    }

    pub fn with_reason(mut self, reason: MovementReason) -> Self {
        self.reason = Some(reason);
        self
    }

    pub fn with_part(mut self, part_id: PartId) -> Self {
        self.part_id = Some(part_id);
        self
    }

    /// 時間區間（含兩端）
    pub fn between(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn matches(&self, movement: &PartMovement) -> bool {
        self.reason.map_or(true, |r| movement.reason == r)
            && self.shipment_id.map_or(true, |id| movement.shipment_id == Some(id))
            && self.part_id.map_or(true, |id| movement.part_id == id)
            && self.from.map_or(true, |from| movement.created_at >= from)
            && self.to.map_or(true, |to| movement.created_at <= to)
    }
}
