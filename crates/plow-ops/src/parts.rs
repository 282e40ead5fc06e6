//! 零件操作

use plow_core::{
    CatalogTx, Database, NewActivity, NewPart, NewPartMovement, Part, PartId, PartMovement,
    PartUpdate, PlowError, Result,
};
use serde::Serialize;

use crate::{Page, PlowService};

/// 零件搜尋的緩存鍵
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartQuery {
    /// 已去除空白並轉小寫
    pub query: String,
    pub page: usize,
    pub per: usize,
}

/// 移除零件的結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PartRemoval {
    /// 仍被引用，改為封存
    Archived(Part),
    Deleted { part_id: PartId },
}

/// 手動調整庫存的結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAdjustment {
    pub part: Part,
    pub movement: PartMovement,
}

impl<D: Database> PlowService<D> {
    /// 新增零件
    pub fn create_part(&mut self, part: NewPart) -> Result<Part> {
        let default_unit = self.config.default_part_unit.as_str();
        let part = self
            .db
            .transaction(|tx| tx.insert_part(part, default_unit))?;

        tracing::info!("新增零件 {}（{}）", part.id, part.name);
        self.invalidate_parts();
        Ok(part)
    }

    /// 修改零件資料（不含庫存）
    pub fn update_part(&mut self, part_id: PartId, update: PartUpdate) -> Result<Part> {
        if update.is_empty() {
            return Err(PlowError::Validation("沒有要更新的欄位".to_string()));
        }

        let part = self.db.transaction(|tx| {
            let mut part = load_part(&*tx, part_id)?;
            update.apply_to(&mut part);
            tx.save_part(part)
        })?;

        tracing::info!("更新零件 {}", part.id);
        self.invalidate_parts();
        Ok(part)
    }

    /// 移除零件：仍被 BOM、異動或出貨單引用時封存，否則刪除
    pub fn remove_part(&mut self, part_id: PartId) -> Result<PartRemoval> {
        let removal = self.db.transaction(|tx| {
            let mut part = load_part(&*tx, part_id)?;
            if tx.part_is_referenced(part_id)? {
                part.is_archived = true;
                Ok(PartRemoval::Archived(tx.save_part(part)?))
            } else {
                tx.delete_part(part_id)?;
                Ok(PartRemoval::Deleted { part_id })
            }
        })?;

        match &removal {
            PartRemoval::Archived(_) => tracing::info!("零件 {} 仍被引用，已封存", part_id),
            PartRemoval::Deleted { .. } => tracing::info!("刪除零件 {}", part_id),
        }
        self.invalidate_parts();
        Ok(removal)
    }

    /// 零件搜尋（名稱包含，不分大小寫，依名稱排序）
    pub fn search_parts(
        &mut self,
        query: &str,
        page: Option<usize>,
        per: Option<usize>,
    ) -> Result<Page<Part>> {
        let key = PartQuery {
            query: query.trim().to_lowercase(),
            page: page.unwrap_or(1).max(1),
            per: self.config.clamp_page_size(per),
        };

        if let Some(cached) = self.part_cache.get(&key) {
            tracing::debug!("零件搜尋緩存命中: {:?}", key);
            return Ok(cached);
        }

        let parts = self.db.transaction(|tx| tx.list_parts())?;
        let matched: Vec<Part> = parts
            .into_iter()
            .filter(|part| part.name_contains(&key.query))
            .collect();
        let result = Page::paginate(matched, key.page, key.per);

        self.part_cache.set(key, result.clone());
        Ok(result)
    }

    /// 手動調整零件庫存，寫入 MANUAL_ADJUST 異動
    pub fn adjust_part_stock(
        &mut self,
        part_id: PartId,
        delta: i64,
        note: Option<String>,
    ) -> Result<StockAdjustment> {
        if delta == 0 {
            return Err(PlowError::Validation("調整量不可為 0".to_string()));
        }

        let adjustment = self.db.transaction(|tx| {
            let part = load_part(&*tx, part_id)?;
            if part.is_archived {
                return Err(PlowError::PartArchived(part_id));
            }

            let part = tx.increment_part_stock(part_id, delta)?;
            let movement = tx.append_movement(NewPartMovement::manual(part_id, delta, note))?;
            tx.append_activity(NewActivity::part_adjusted(part_id, delta, part.stock))?;
            Ok(StockAdjustment { part, movement })
        })?;

        tracing::info!(
            "零件 {} 庫存調整 {:+}，目前 {}",
            part_id,
            delta,
            adjustment.part.stock
        );
        if adjustment.part.is_oversold() {
            tracing::warn!("零件 {} 庫存為負: {}", part_id, adjustment.part.stock);
        }
        self.invalidate_parts();
        Ok(adjustment)
    }
}

fn load_part(tx: &dyn CatalogTx, part_id: PartId) -> Result<Part> {
    tx.get_part(part_id)?
        .ok_or_else(|| PlowError::not_found("零件", part_id))
}
