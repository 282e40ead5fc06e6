//! 產品目錄
//!
//! 產品是型號 + 序號，底下固定有四個成品庫存列（兩種外觀 × 是否擺動座）。
//! 出廠產品在第一次查詢時補齊；手動新增的產品才可刪除。

use plow_core::{CatalogTx, Database, PlowError, PlowModel, Product, Result, FIXED_PRODUCTS};
use std::collections::BTreeSet;

use crate::PlowService;

impl<D: Database> PlowService<D> {
    /// 產品列表，依型號再依序號排序
    pub fn list_products(&self) -> Result<Vec<Product>> {
        self.db.transaction(|tx| {
            let seeded = seed_fixed_products(&mut *tx)?;
            if seeded > 0 {
                tracing::info!("補齊出廠產品庫存列 {} 筆", seeded);
            }

            let products: BTreeSet<Product> = tx
                .list_inventory()?
                .into_iter()
                .map(|item| Product::new(item.key.model, item.key.serial_number, item.is_manual))
                .collect();
            Ok(products.into_iter().collect())
        })
    }

    /// 手動新增產品；已存在的庫存列保持不變
    pub fn create_product(&self, model: PlowModel, serial_number: i32) -> Result<Product> {
        check_serial(serial_number)?;
        let product = Product::new(model, serial_number, true);

        let created = self.db.transaction(|tx| {
            let mut created = 0;
            for key in product.inventory_keys() {
                if tx.ensure_inventory(key, true)? {
                    created += 1;
                }
            }
            Ok(created)
        })?;

        tracing::info!(
            "新增產品 {} #{}（新建庫存列 {} 筆）",
            model.display_name(),
            serial_number,
            created
        );
        Ok(product)
    }

    /// 刪除手動新增的產品；出廠產品不可刪除
    pub fn delete_product(&self, model: PlowModel, serial_number: i32) -> Result<usize> {
        check_serial(serial_number)?;

        let deleted = self.db.transaction(|tx| {
            let deleted = tx.delete_manual_inventory(model, serial_number)?;
            if deleted == 0 {
                return Err(PlowError::Conflict(format!(
                    "固定產品不可刪除: {} #{}",
                    model.display_name(),
                    serial_number
                )));
            }
            Ok(deleted)
        })?;

        tracing::info!(
            "刪除產品 {} #{}（{} 筆）",
            model.display_name(),
            serial_number,
            deleted
        );
        Ok(deleted)
    }
}

fn check_serial(serial_number: i32) -> Result<()> {
    if serial_number <= 0 {
        return Err(PlowError::Validation(format!(
            "序號必須為正整數: {}",
            serial_number
        )));
    }
    Ok(())
}

fn seed_fixed_products(tx: &mut dyn CatalogTx) -> Result<usize> {
    let mut seeded = 0;
    for (model, serial_number) in FIXED_PRODUCTS {
        for key in Product::new(model, serial_number, false).inventory_keys() {
            if tx.ensure_inventory(key, false)? {
                seeded += 1;
            }
        }
    }
    Ok(seeded)
}
