//! 零件目錄模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PartId;

/// 零件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// 零件ID
    pub id: PartId,

    /// 名稱（不分大小寫唯一）
    pub name: String,

    /// 現有庫存，可為負（超賣）
    pub stock: i64,

    /// 單位
    pub unit: String,

    /// 採購商店
    pub shop_name: Option<String>,

    /// 採購連結
    pub shop_url: Option<String>,

    /// 已封存（被 BOM 或異動引用後不再硬刪除）
    pub is_archived: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Part {
    /// 名稱是否相同（不分大小寫）
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// 名稱是否包含查詢字串（不分大小寫）
    pub fn name_contains(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }

    /// 庫存是否為負
    pub fn is_oversold(&self) -> bool {
        self.stock < 0
    }
}

/// 新增零件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPart {
    pub name: String,
    pub stock: i64,
    pub unit: Option<String>,
    pub shop_name: Option<String>,
    pub shop_url: Option<String>,
}

impl NewPart {
    pub fn new(name: impl Into<String>, stock: i64) -> Self {
        Self {
            name: name.into(),
            stock,
            unit: None,
            shop_name: None,
            shop_url: None,
        }
    }

    /// 建構器模式：設置單位
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// 建構器模式：設置採購商店
    pub fn with_shop(mut self, shop_name: impl Into<String>, shop_url: impl Into<String>) -> Self {
        self.shop_name = Some(shop_name.into());
        self.shop_url = Some(shop_url.into());
        self
    }
}

/// 零件部分更新；`Some(None)` 表示清除欄位
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub shop_name: Option<Option<String>>,
    pub shop_url: Option<Option<String>>,
}

impl PartUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.unit.is_none() && self.shop_name.is_none() && self.shop_url.is_none()
    }

    /// 套用到既有零件
    pub fn apply_to(&self, part: &mut Part) {
        if let Some(name) = &self.name {
            part.name = name.clone();
        }
        if let Some(unit) = &self.unit {
            part.unit = unit.clone();
        }
        if let Some(shop_name) = &self.shop_name {
            part.shop_name = shop_name.clone();
        }
        if let Some(shop_url) = &self.shop_url {
            part.shop_url = shop_url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(name: &str, stock: i64) -> Part {
        Part {
            id: 1,
            name: name.to_string(),
            stock,
            unit: "pcs".to_string(),
            shop_name: None,
            shop_url: None,
            is_archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_name_matching_is_case_insensitive() {
        let p = part("Hydraulikschlauch 1/4", 10);
        assert!(p.matches_name("hydraulikschlauch 1/4"));
        assert!(!p.matches_name("Hydraulikschlauch"));
        assert!(p.name_contains("SCHLAUCH"));
    }

    #[test]
    fn test_oversold() {
        assert!(part("Bolt", -2).is_oversold());
        assert!(!part("Bolt", 0).is_oversold());
    }

    #[test]
    fn test_update_clears_shop() {
        let mut p = part("Bolt", 1);
        p.shop_name = Some("Würth".to_string());

        let update = PartUpdate {
            name: Some("Bolt M8".to_string()),
            shop_name: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply_to(&mut p);

        assert_eq!(p.name, "Bolt M8");
        assert_eq!(p.shop_name, None);
        assert!(PartUpdate::default().is_empty());
    }
}
