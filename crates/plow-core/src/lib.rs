//! # Plow Core
//!
//! 核心資料模型與類型定義

pub mod activity;
pub mod bom;
pub mod config;
pub mod inventory;
pub mod movement;
pub mod part;
pub mod request;
pub mod shipment;
pub mod store;

// Re-export 主要類型
pub use activity::{ActivityLog, NewActivity};
pub use bom::{Bom, BomItem, BomKey, BomType, GLOBAL_MODEL_NAME};
pub use config::LedgerConfig;
pub use inventory::{InventoryItem, InventoryKey, Product, FIXED_PRODUCTS};
pub use movement::{MovementFilter, MovementReason, NewPartMovement, PartMovement};
pub use part::{NewPart, Part, PartUpdate};
pub use shipment::{
    Customer, NewShipment, PlowModel, Shipment, ShipmentExtraItem, ShipmentItem, ShipmentStatus,
    ValveType, Variant,
};
pub use store::{CatalogTx, Database, LedgerTx};

/// 零件 ID
pub type PartId = i64;
/// 出貨單 ID
pub type ShipmentId = i64;
/// BOM ID
pub type BomId = i64;
/// 庫存異動 ID
pub type MovementId = i64;
/// 操作紀錄 ID
pub type ActivityId = i64;

/// 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlowError {
    #[error("找不到{entity}: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("驗證失敗: {0}")]
    Validation(String),

    #[error("成品庫存不足: {key}（需要 {required}，現有 {available}）")]
    InsufficientStock {
        key: String,
        required: i64,
        available: i64,
    },

    #[error("零件已封存: {0}")]
    PartArchived(PartId),

    #[error("資料衝突: {0}")]
    Conflict(String),

    #[error("儲存層錯誤: {0}")]
    Storage(String),

    #[error("配置錯誤: {0}")]
    Config(String),
}

impl PlowError {
    /// 建立 NotFound 錯誤
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for PlowError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlowError>;
