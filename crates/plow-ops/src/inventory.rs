//! 成品庫存操作

use plow_core::{Database, InventoryItem, InventoryKey, PlowError, Result};

use crate::PlowService;

impl<D: Database> PlowService<D> {
    /// 調整成品庫存，結果不可為負
    pub fn adjust_inventory(&self, key: InventoryKey, delta: i64) -> Result<InventoryItem> {
        if delta == 0 {
            return Err(PlowError::Validation("調整量不可為 0".to_string()));
        }

        let item = self.db.transaction(|tx| {
            let available = tx.get_inventory(&key)?.map_or(0, |item| item.quantity);
            let next = available.checked_add(delta).ok_or_else(|| {
                PlowError::Validation(format!("成品 {} 數量超出範圍", key))
            })?;
            if next < 0 {
                return Err(PlowError::InsufficientStock {
                    key: key.to_string(),
                    required: -delta,
                    available,
                });
            }
            tx.set_inventory(key, next)
        })?;

        tracing::info!("成品 {} 調整 {:+}，目前 {}", key, delta, item.quantity);
        Ok(item)
    }

    /// 成品庫存列表（依鍵排序）
    pub fn list_inventory(&self) -> Result<Vec<InventoryItem>> {
        self.db.transaction(|tx| tx.list_inventory())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fl540_key, service};

    #[test]
    fn test_adjust_accumulates() {
        let service = service();
        service.adjust_inventory(fl540_key(), 3).unwrap();
        let item = service.adjust_inventory(fl540_key(), -1).unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(service.list_inventory().unwrap(), vec![item]);
    }

    #[test]
    fn test_adjust_cannot_go_negative() {
        let service = service();
        service.adjust_inventory(fl540_key(), 1).unwrap();

        let err = service.adjust_inventory(fl540_key(), -2).unwrap_err();
        assert!(matches!(
            err,
            PlowError::InsufficientStock {
                required: 2,
                available: 1,
                ..
            }
        ));
        assert!(matches!(
            service.adjust_inventory(fl540_key(), 0),
            Err(PlowError::Validation(_))
        ));
    }
}
