//! BOM 維護

use plow_core::{Bom, BomItem, BomKey, Database, NewActivity, PlowError, Result};

use crate::PlowService;

impl<D: Database> PlowService<D> {
    /// 查詢 BOM；不存在時回傳 `None`
    pub fn get_bom(&self, key: &BomKey) -> Result<Option<Bom>> {
        key.validate()?;
        self.db.transaction(|tx| tx.get_bom(key))
    }

    /// 整批替換 BOM 明細
    pub fn replace_bom(&self, key: BomKey, items: Vec<BomItem>) -> Result<Bom> {
        key.validate()?;
        if let Some(item) = items.iter().find(|item| item.qty_per_unit < 1) {
            return Err(PlowError::Validation(format!(
                "零件 {} 的單位用量必須大於 0",
                item.part_id
            )));
        }

        let bom = self.db.transaction(|tx| {
            let count = items.len();
            let bom = tx.replace_bom(key.clone(), items)?;
            tx.append_activity(NewActivity::bom_replaced(&key, count))?;
            Ok(bom)
        })?;

        tracing::info!("BOM {} 已替換為 {} 項", bom.key(), bom.items.len());
        Ok(bom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::service;
    use plow_core::{BomType, NewPart, PlowModel};
    use rstest::rstest;

    #[test]
    fn test_replace_then_get() {
        let mut service = service();
        let a = service.create_part(NewPart::new("Schar", 1)).unwrap();
        let b = service.create_part(NewPart::new("Kufe", 1)).unwrap();
        let key = BomKey::for_model(PlowModel::Fl340, BomType::Standard);

        let first = service
            .replace_bom(key.clone(), vec![BomItem::new(a.id, 2)])
            .unwrap();
        let second = service
            .replace_bom(key.clone(), vec![BomItem::new(b.id, 1), BomItem::new(a.id, 4)])
            .unwrap();
        assert_eq!(first.id, second.id);

        let loaded = service.get_bom(&key).unwrap().unwrap();
        assert_eq!(loaded.items, vec![BomItem::new(b.id, 1), BomItem::new(a.id, 4)]);
        assert_eq!(service.list_activity(Some("bom"), None, None).unwrap().items.len(), 2);
    }

    #[rstest]
    #[case(BomKey::new("FL 999", BomType::Standard))]
    #[case(BomKey::new("FL 540", BomType::Schwenkbock3000))]
    #[case(BomKey::new("GLOBAL", BomType::Addon62))]
    fn test_invalid_key_rejected(#[case] key: BomKey) {
        let service = service();
        assert!(matches!(service.get_bom(&key), Err(PlowError::Validation(_))));
        assert!(matches!(
            service.replace_bom(key, Vec::new()),
            Err(PlowError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_quantity_and_unknown_part_rejected() {
        let mut service = service();
        let a = service.create_part(NewPart::new("Schar", 1)).unwrap();
        let key = BomKey::global(BomType::Schwenkbock2000);

        assert!(matches!(
            service.replace_bom(key.clone(), vec![BomItem::new(a.id, 0)]),
            Err(PlowError::Validation(_))
        ));
        assert!(matches!(
            service.replace_bom(key.clone(), vec![BomItem::new(404, 1)]),
            Err(PlowError::NotFound { .. })
        ));
        assert!(service.get_bom(&key).unwrap().is_none());
    }
}
