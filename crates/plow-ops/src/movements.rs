//! 零件異動查詢

use plow_core::{Database, MovementFilter, PartMovement, Result};

use crate::{Page, PlowService};

impl<D: Database> PlowService<D> {
    /// 異動列表（新到舊），依原因、出貨單、零件與時間區間篩選
    pub fn list_movements(
        &self,
        filter: &MovementFilter,
        page: Option<usize>,
        per: Option<usize>,
    ) -> Result<Page<PartMovement>> {
        let movements = self.db.transaction(|tx| tx.list_movements(filter))?;
        Ok(Page::paginate(
            movements,
            page.unwrap_or(1),
            self.config.clamp_page_size(per),
        ))
    }
}
