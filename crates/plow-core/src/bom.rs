//! BOM 模型

use serde::{Deserialize, Serialize};

use crate::shipment::PlowModel;
use crate::{BomId, PartId, PlowError, Result};

/// Schwenkbock BOM 共用的型號名稱
pub const GLOBAL_MODEL_NAME: &str = "GLOBAL";

/// BOM 類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BomType {
    /// 標準雪鏟
    #[serde(rename = "STANDARD")]
    Standard,
    /// 6/2 閥組加購
    #[serde(rename = "ADDON_6_2")]
    Addon62,
    /// 大型 Schwenkbock 擺動座
    #[serde(rename = "SCHWENKBOCK_3000")]
    Schwenkbock3000,
    /// 小型 Schwenkbock 擺動座
    #[serde(rename = "SCHWENKBOCK_2000")]
    Schwenkbock2000,
}

impl BomType {
    pub const ALL: [BomType; 4] = [
        BomType::Standard,
        BomType::Addon62,
        BomType::Schwenkbock3000,
        BomType::Schwenkbock2000,
    ];

    /// 是否為跨型號共用（GLOBAL）的 BOM
    pub fn is_global(&self) -> bool {
        matches!(self, BomType::Schwenkbock3000 | BomType::Schwenkbock2000)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BomType::Standard => "STANDARD",
            BomType::Addon62 => "ADDON_6_2",
            BomType::Schwenkbock3000 => "SCHWENKBOCK_3000",
            BomType::Schwenkbock2000 => "SCHWENKBOCK_2000",
        }
    }
}

impl std::fmt::Display for BomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BOM 唯一鍵：(model_name, bom_type)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BomKey {
    pub model_name: String,
    pub bom_type: BomType,
}

impl BomKey {
    pub fn new(model_name: impl Into<String>, bom_type: BomType) -> Self {
        Self {
            model_name: model_name.into(),
            bom_type,
        }
    }

    /// 型號專屬的 BOM 鍵
    pub fn for_model(model: PlowModel, bom_type: BomType) -> Self {
        Self::new(model.display_name(), bom_type)
    }

    /// GLOBAL BOM 鍵
    pub fn global(bom_type: BomType) -> Self {
        Self::new(GLOBAL_MODEL_NAME, bom_type)
    }

    /// 檢查鍵是否合法
    ///
    /// Schwenkbock 類型只能掛在 GLOBAL 下，其餘類型必須是已知型號。
    pub fn validate(&self) -> Result<()> {
        if self.bom_type.is_global() {
            if self.model_name != GLOBAL_MODEL_NAME {
                return Err(PlowError::Validation(format!(
                    "{} 必須使用型號名稱 {}",
                    self.bom_type, GLOBAL_MODEL_NAME
                )));
            }
        } else if PlowModel::from_display_name(&self.model_name).is_none() {
            return Err(PlowError::Validation(format!(
                "未知型號: {}",
                self.model_name
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for BomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.model_name, self.bom_type)
    }
}

/// BOM 明細行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomItem {
    pub part_id: PartId,
    /// 每台用量
    pub qty_per_unit: i64,
}

impl BomItem {
    pub fn new(part_id: PartId, qty_per_unit: i64) -> Self {
        Self {
            part_id,
            qty_per_unit,
        }
    }
}

/// BOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bom {
    pub id: BomId,
    pub model_name: String,
    pub bom_type: BomType,
    /// 依輸入順序保存
    pub items: Vec<BomItem>,
}

impl Bom {
    pub fn key(&self) -> BomKey {
        BomKey::new(self.model_name.clone(), self.bom_type)
    }

    /// 是否引用某零件
    pub fn references(&self, part_id: PartId) -> bool {
        self.items.iter().any(|item| item.part_id == part_id)
    }
}
