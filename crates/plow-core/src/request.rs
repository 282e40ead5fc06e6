//! 外部請求結構與驗證
//!
//! 請求先經 serde 反序列化（未知的列舉字串在此失敗），再經 `validator`
//! 檢查欄位，最後轉成已驗證的領域類型。

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use validator::{Validate, ValidationError};

use crate::bom::{BomItem, BomKey, BomType};
use crate::inventory::{InventoryKey, Product};
use crate::part::{NewPart, PartUpdate};
use crate::shipment::{
    Customer, NewShipment, PlowModel, ShipmentExtraItem, ShipmentItem, ShipmentStatus, ValveType,
    Variant,
};
use crate::{PartId, PlowError, Result};

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn non_zero(value: i64) -> std::result::Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new("zero"));
    }
    Ok(())
}

fn trimmed_or_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 出貨明細請求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentItemRequest {
    pub model: PlowModel,
    #[validate(range(min = 1))]
    pub serial_number: i32,
    pub variant: Variant,
    #[serde(default)]
    pub is_schwenkbock: bool,
    #[serde(default)]
    pub valve_type: ValveType,
    #[serde(default)]
    pub bucket_holder: bool,
    #[validate(range(min = 1, max = 100_000))]
    pub quantity: i64,
    #[validate(custom(function = "not_blank"))]
    pub build_number: String,
    pub build_date: NaiveDate,
    pub extra_parts: Option<String>,
}

impl ShipmentItemRequest {
    fn into_item(self) -> ShipmentItem {
        ShipmentItem {
            model: self.model,
            serial_number: self.serial_number,
            variant: self.variant,
            is_schwenkbock: self.is_schwenkbock,
            valve_type: self.valve_type,
            bucket_holder: self.bucket_holder,
            quantity: self.quantity,
            build_number: self.build_number.trim().to_string(),
            build_date: self.build_date,
            extra_parts: trimmed_or_none(self.extra_parts),
        }
    }
}

/// 額外零件請求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExtraItemRequest {
    #[validate(length(min = 2), custom(function = "not_blank"))]
    pub name: String,
    #[validate(range(min = 1, max = 100_000))]
    pub quantity: i64,
    pub note: Option<String>,
    pub part_id: Option<PartId>,
}

impl ExtraItemRequest {
    fn into_extra(self) -> ShipmentExtraItem {
        ShipmentExtraItem {
            name: Some(self.name.trim().to_string()),
            // 非正數 ID 視同未指定
            part_id: self.part_id.filter(|id| *id > 0),
            quantity: self.quantity,
            note: trimmed_or_none(self.note),
        }
    }
}

/// 建立/更新出貨單請求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRequest {
    #[validate(custom(function = "not_blank"))]
    pub company_name: String,
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
    #[validate(custom(function = "not_blank"))]
    pub street: String,
    #[validate(custom(function = "not_blank"))]
    pub postal_code: String,
    #[validate(custom(function = "not_blank"))]
    pub city: String,
    #[validate(custom(function = "not_blank"))]
    pub country: String,
    pub notes: Option<String>,
    pub status: Option<ShipmentStatus>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<ShipmentItemRequest>,
    #[serde(default)]
    #[validate(nested)]
    pub extras: Vec<ExtraItemRequest>,
}

impl ShipmentRequest {
    /// 從 JSON 解析
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PlowError::Validation(e.to_string()))
    }

    /// 驗證並轉為領域類型
    pub fn into_new_shipment(self) -> Result<NewShipment> {
        self.validate()?;

        if self.items.is_empty() && self.extras.is_empty() {
            return Err(PlowError::Validation("缺少出貨明細".to_string()));
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.build_number.trim().to_string()) {
                return Err(PlowError::Validation(format!(
                    "生產編號重複: {}",
                    item.build_number.trim()
                )));
            }
        }

        Ok(NewShipment {
            customer: Customer {
                company_name: self.company_name.trim().to_string(),
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                street: self.street.trim().to_string(),
                postal_code: self.postal_code.trim().to_string(),
                city: self.city.trim().to_string(),
                country: self.country.trim().to_string(),
            },
            notes: trimmed_or_none(self.notes),
            status: self.status,
            items: self.items.into_iter().map(ShipmentItemRequest::into_item).collect(),
            extras: self.extras.into_iter().map(ExtraItemRequest::into_extra).collect(),
        })
    }
}

/// 新增零件請求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartRequest {
    #[validate(length(min = 2))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = -1_000_000_000, max = 1_000_000_000))]
    pub stock: i64,
    pub unit: Option<String>,
    pub shop_name: Option<String>,
    pub shop_url: Option<String>,
}

impl PartRequest {
    pub fn into_new_part(self) -> Result<NewPart> {
        self.validate()?;
        let name = self.name.trim().to_string();
        if name.chars().count() < 2 {
            return Err(PlowError::Validation("零件名稱至少 2 個字元".to_string()));
        }
        Ok(NewPart {
            name,
            stock: self.stock,
            unit: trimmed_or_none(self.unit),
            shop_name: trimmed_or_none(self.shop_name),
            shop_url: trimmed_or_none(self.shop_url),
        })
    }
}

/// 更新零件請求；商店欄位傳空字串代表清除
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartUpdateRequest {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub shop_name: Option<String>,
    pub shop_url: Option<String>,
}

impl PartUpdateRequest {
    pub fn into_update(self) -> Result<PartUpdate> {
        let name = match self.name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.chars().count() < 2 {
                    return Err(PlowError::Validation("零件名稱至少 2 個字元".to_string()));
                }
                Some(name)
            }
            None => None,
        };
        let update = PartUpdate {
            name,
            unit: trimmed_or_none(self.unit),
            shop_name: self.shop_name.map(|v| trimmed_or_none(Some(v))),
            shop_url: self.shop_url.map(|v| trimmed_or_none(Some(v))),
        };
        if update.is_empty() {
            return Err(PlowError::Validation("缺少更新欄位".to_string()));
        }
        Ok(update)
    }
}

/// BOM 明細請求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BomItemRequest {
    #[validate(range(min = 1))]
    pub part_id: PartId,
    #[validate(range(min = 1, max = 10_000))]
    pub qty_per_unit: i64,
}

/// 整批替換 BOM 請求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BomRequest {
    #[validate(custom(function = "not_blank"))]
    pub model_name: String,
    pub bom_type: BomType,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<BomItemRequest>,
}

impl BomRequest {
    pub fn into_parts(self) -> Result<(BomKey, Vec<BomItem>)> {
        self.validate()?;
        let key = BomKey::new(self.model_name.trim(), self.bom_type);
        key.validate()?;
        let items = self
            .items
            .into_iter()
            .map(|item| BomItem::new(item.part_id, item.qty_per_unit))
            .collect();
        Ok((key, items))
    }
}

/// 手動調整零件庫存請求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartAdjustRequest {
    pub part_id: PartId,
    #[validate(custom(function = "non_zero"), range(min = -1_000_000_000, max = 1_000_000_000))]
    pub delta: i64,
    pub note: Option<String>,
}

impl PartAdjustRequest {
    pub fn into_parts(self) -> Result<(PartId, i64, Option<String>)> {
        self.validate()?;
        Ok((self.part_id, self.delta, trimmed_or_none(self.note)))
    }
}

/// 調整成品庫存請求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAdjustRequest {
    pub model: PlowModel,
    #[validate(range(min = 1))]
    pub serial_number: i32,
    pub variant: Variant,
    #[serde(default)]
    pub is_schwenkbock: bool,
    #[validate(custom(function = "non_zero"), range(min = -100_000, max = 100_000))]
    pub delta: i64,
}

impl InventoryAdjustRequest {
    pub fn into_parts(self) -> Result<(InventoryKey, i64)> {
        self.validate()?;
        Ok((
            InventoryKey::new(self.model, self.serial_number, self.variant, self.is_schwenkbock),
            self.delta,
        ))
    }
}

/// 新增或刪除產品請求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub model: PlowModel,
    #[validate(range(min = 1))]
    pub serial_number: i32,
}

impl ProductRequest {
    pub fn into_product(self) -> Result<Product> {
        self.validate()?;
        Ok(Product::new(self.model, self.serial_number, true))
    }
}
