//! 出貨單模型

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::inventory::InventoryKey;
use crate::{PartId, ShipmentId};

/// 雪鏟型號
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlowModel {
    #[serde(rename = "FL_640")]
    Fl640,
    #[serde(rename = "FL_540")]
    Fl540,
    #[serde(rename = "FL_470")]
    Fl470,
    #[serde(rename = "FL_400")]
    Fl400,
    #[serde(rename = "FL_340")]
    Fl340,
    #[serde(rename = "FL_260")]
    Fl260,
}

impl PlowModel {
    pub const ALL: [PlowModel; 6] = [
        PlowModel::Fl640,
        PlowModel::Fl540,
        PlowModel::Fl470,
        PlowModel::Fl400,
        PlowModel::Fl340,
        PlowModel::Fl260,
    ];

    /// BOM 使用的型號名稱（例如 "FL 640"）
    pub fn display_name(&self) -> &'static str {
        match self {
            PlowModel::Fl640 => "FL 640",
            PlowModel::Fl540 => "FL 540",
            PlowModel::Fl470 => "FL 470",
            PlowModel::Fl400 => "FL 400",
            PlowModel::Fl340 => "FL 340",
            PlowModel::Fl260 => "FL 260",
        }
    }

    /// 由型號名稱反查
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.display_name() == name)
    }
}

/// 外觀版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Variant {
    Zinc,
    Orange,
}

/// 閥組類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValveType {
    #[default]
    None,
    Small,
    Large,
}

impl ValveType {
    /// 是否帶 6/2 閥組
    pub fn has_valve(&self) -> bool {
        *self != ValveType::None
    }
}

/// 出貨狀態
///
/// RESERVED → READY → SENT；只有 READY 會扣減零件庫存。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    #[default]
    Reserved,
    Ready,
    Sent,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Reserved => "RESERVED",
            ShipmentStatus::Ready => "READY",
            ShipmentStatus::Sent => "SENT",
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 出貨明細（成品）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentItem {
    pub model: PlowModel,
    pub serial_number: i32,
    pub variant: Variant,
    pub is_schwenkbock: bool,
    pub valve_type: ValveType,
    pub bucket_holder: bool,
    pub quantity: i64,
    pub build_number: String,
    pub build_date: NaiveDate,
    pub extra_parts: Option<String>,
}

impl ShipmentItem {
    /// 創建新的出貨明細（無加購選項）
    pub fn new(
        model: PlowModel,
        serial_number: i32,
        variant: Variant,
        quantity: i64,
        build_number: String,
        build_date: NaiveDate,
    ) -> Self {
        Self {
            model,
            serial_number,
            variant,
            is_schwenkbock: false,
            valve_type: ValveType::None,
            bucket_holder: false,
            quantity,
            build_number,
            build_date,
            extra_parts: None,
        }
    }

    /// 建構器模式：設置 Schwenkbock 擺動座
    pub fn with_schwenkbock(mut self, is_schwenkbock: bool) -> Self {
        self.is_schwenkbock = is_schwenkbock;
        self
    }

    /// 建構器模式：設置閥組
    pub fn with_valve_type(mut self, valve_type: ValveType) -> Self {
        self.valve_type = valve_type;
        self
    }

    /// 建構器模式：設置鏟斗支架
    pub fn with_bucket_holder(mut self, bucket_holder: bool) -> Self {
        self.bucket_holder = bucket_holder;
        self
    }

    /// 成品庫存鍵
    pub fn inventory_key(&self) -> InventoryKey {
        InventoryKey::new(
            self.model,
            self.serial_number,
            self.variant,
            self.is_schwenkbock,
        )
    }
}

/// 額外零件（非 BOM）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentExtraItem {
    pub name: Option<String>,
    pub part_id: Option<PartId>,
    pub quantity: i64,
    pub note: Option<String>,
}

impl ShipmentExtraItem {
    /// 以名稱指定的額外零件
    pub fn named(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: Some(name.into()),
            part_id: None,
            quantity,
            note: None,
        }
    }

    /// 以零件 ID 指定的額外零件
    pub fn for_part(part_id: PartId, quantity: i64) -> Self {
        Self {
            name: None,
            part_id: Some(part_id),
            quantity,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// 收貨客戶
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub company_name: String,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

/// 出貨單
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub customer: Customer,
    pub notes: Option<String>,
    pub status: ShipmentStatus,
    pub items: Vec<ShipmentItem>,
    pub extras: Vec<ShipmentExtraItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 待建立的出貨單（已驗證）
#[derive(Debug, Clone)]
pub struct NewShipment {
    pub customer: Customer,
    pub notes: Option<String>,
    /// 未指定時：新單為 RESERVED，更新時沿用原狀態
    pub status: Option<ShipmentStatus>,
    pub items: Vec<ShipmentItem>,
    pub extras: Vec<ShipmentExtraItem>,
}

impl NewShipment {
    /// 創建新的出貨單
    pub fn new(customer: Customer) -> Self {
        Self {
            customer,
            notes: None,
            status: None,
            items: Vec::new(),
            extras: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: ShipmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_item(mut self, item: ShipmentItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_extra(mut self, extra: ShipmentExtraItem) -> Self {
        self.extras.push(extra);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PlowModel::Fl640, "FL 640")]
    #[case(PlowModel::Fl540, "FL 540")]
    #[case(PlowModel::Fl260, "FL 260")]
    fn test_model_display_name_round_trip(#[case] model: PlowModel, #[case] name: &str) {
        assert_eq!(model.display_name(), name);
        assert_eq!(PlowModel::from_display_name(name), Some(model));
    }

    #[test]
    fn test_unknown_display_name() {
        assert_eq!(PlowModel::from_display_name("FL 999"), None);
        assert_eq!(PlowModel::from_display_name("GLOBAL"), None);
    }

    #[test]
    fn test_valve_detection() {
        assert!(!ValveType::None.has_valve());
        assert!(ValveType::Small.has_valve());
        assert!(ValveType::Large.has_valve());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&PlowModel::Fl540).unwrap(), "\"FL_540\"");
        assert_eq!(
            serde_json::to_string(&ShipmentStatus::Reserved).unwrap(),
            "\"RESERVED\""
        );
        let variant: Variant = serde_json::from_str("\"ORANGE\"").unwrap();
        assert_eq!(variant, Variant::Orange);
        assert!(serde_json::from_str::<ValveType>("\"HUGE\"").is_err());
    }

    #[test]
    fn test_item_builder() {
        let item = ShipmentItem::new(
            PlowModel::Fl470,
            12,
            Variant::Zinc,
            1,
            "B-100".to_string(),
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
        )
        .with_schwenkbock(true)
        .with_valve_type(ValveType::Small);

        assert!(item.is_schwenkbock);
        assert!(item.valve_type.has_valve());
        assert_eq!(
            item.inventory_key(),
            InventoryKey::new(PlowModel::Fl470, 12, Variant::Zinc, true)
        );
    }
}
