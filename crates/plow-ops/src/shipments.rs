//! 出貨單操作
//!
//! 建立與更新時依成品庫存鍵預留成品；成品不足直接中止交易。
//! 零件庫存一律交由對帳器處理。

use plow_core::{
    CatalogTx, Database, InventoryItem, InventoryKey, NewActivity, NewShipment, PlowError, Result,
    Shipment, ShipmentExtraItem, ShipmentId, ShipmentItem, ShipmentStatus,
};
use plow_ledger::{ReconcileOutcome, Reconciler, StockWarning};
use serde::Serialize;

use crate::PlowService;

/// 出貨單操作結果
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentResult {
    pub shipment: Shipment,
    pub reconcile: ReconcileOutcome,
}

impl ShipmentResult {
    /// 負庫存警告
    pub fn stock_warnings(&self) -> &[StockWarning] {
        &self.reconcile.warnings
    }
}

impl<D: Database> PlowService<D> {
    /// 建立出貨單
    pub fn create_shipment(&mut self, request: NewShipment) -> Result<ShipmentResult> {
        let config = &self.config;
        let result = self.db.transaction(|tx| {
            ensure_extra_parts_exist(&*tx, &request.extras)?;
            reserve_finished_goods(tx, &request.items)?;

            let shipment = tx.insert_shipment(request)?;
            let reconcile = Reconciler::new(config).reconcile(&mut *tx, &shipment)?;
            tx.append_activity(NewActivity::shipment_created(&shipment))?;

            Ok(ShipmentResult {
                shipment,
                reconcile,
            })
        })?;

        tracing::info!(
            "建立出貨單 {}（{}，{} 項明細）",
            result.shipment.id,
            result.shipment.status,
            result.shipment.items.len()
        );
        if result.reconcile.changed_stock() {
            self.invalidate_parts();
        }
        Ok(result)
    }

    /// 更新出貨單：替換客戶資料、明細與額外零件，可選擇同時變更狀態
    pub fn update_shipment(
        &mut self,
        shipment_id: ShipmentId,
        request: NewShipment,
    ) -> Result<ShipmentResult> {
        let config = &self.config;
        let result = self.db.transaction(|tx| {
            let mut shipment = load_shipment(&*tx, shipment_id)?;
            ensure_extra_parts_exist(&*tx, &request.extras)?;

            restore_finished_goods(tx, &shipment.items)?;
            reserve_finished_goods(tx, &request.items)?;

            let previous = shipment.status;
            shipment.customer = request.customer;
            shipment.notes = request.notes;
            shipment.items = request.items;
            shipment.extras = request.extras;
            shipment.status = request.status.unwrap_or(previous);

            let shipment = tx.save_shipment(shipment)?;
            let reconcile = Reconciler::new(config).reconcile(&mut *tx, &shipment)?;
            if shipment.status != previous {
                tx.append_activity(NewActivity::shipment_status(
                    shipment.id,
                    previous,
                    shipment.status,
                ))?;
            }

            Ok(ShipmentResult {
                shipment,
                reconcile,
            })
        })?;

        tracing::info!("更新出貨單 {}（{}）", result.shipment.id, result.shipment.status);
        if result.reconcile.changed_stock() {
            self.invalidate_parts();
        }
        Ok(result)
    }

    /// 變更出貨狀態並對帳
    ///
    /// 任何狀態之間都可切換；重複設定同一狀態也會重新對帳。
    pub fn set_shipment_status(
        &mut self,
        shipment_id: ShipmentId,
        status: ShipmentStatus,
    ) -> Result<ShipmentResult> {
        let config = &self.config;
        let result = self.db.transaction(|tx| {
            let mut shipment = load_shipment(&*tx, shipment_id)?;
            let previous = shipment.status;
            shipment.status = status;

            let shipment = tx.save_shipment(shipment)?;
            let reconcile = Reconciler::new(config).reconcile(&mut *tx, &shipment)?;
            tx.append_activity(NewActivity::shipment_status(shipment.id, previous, status))?;

            Ok(ShipmentResult {
                shipment,
                reconcile,
            })
        })?;

        tracing::info!("出貨單 {} 狀態變更為 {}", shipment_id, status);
        if result.reconcile.changed_stock() {
            self.invalidate_parts();
        }
        Ok(result)
    }

    /// 刪除出貨單：退回成品與已扣零件後移除
    pub fn delete_shipment(&mut self, shipment_id: ShipmentId) -> Result<ReconcileOutcome> {
        let config = &self.config;
        let outcome = self.db.transaction(|tx| {
            let shipment = load_shipment(&*tx, shipment_id)?;

            restore_finished_goods(tx, &shipment.items)?;
            let outcome = Reconciler::new(config).rollback(&mut *tx, shipment.id)?;
            tx.delete_shipment(shipment.id)?;
            tx.append_activity(NewActivity::shipment_deleted(&shipment))?;

            Ok(outcome)
        })?;

        tracing::info!("刪除出貨單 {}，退回 {} 項零件", shipment_id, outcome.delta.len());
        if outcome.changed_stock() {
            self.invalidate_parts();
        }
        Ok(outcome)
    }

    /// 出貨單列表（新到舊），可依狀態篩選
    pub fn list_shipments(&self, status: Option<ShipmentStatus>) -> Result<Vec<Shipment>> {
        let shipments = self.db.transaction(|tx| tx.list_shipments())?;
        Ok(shipments
            .into_iter()
            .filter(|s| status.map_or(true, |wanted| s.status == wanted))
            .collect())
    }

    pub fn get_shipment(&self, shipment_id: ShipmentId) -> Result<Shipment> {
        self.db
            .transaction(|tx| load_shipment(&*tx, shipment_id))
    }
}

fn load_shipment(tx: &dyn CatalogTx, shipment_id: ShipmentId) -> Result<Shipment> {
    tx.get_shipment(shipment_id)?
        .ok_or_else(|| PlowError::not_found("出貨單", shipment_id))
}

/// 明確指定 part_id 的額外零件必須存在
fn ensure_extra_parts_exist(tx: &dyn CatalogTx, extras: &[ShipmentExtraItem]) -> Result<()> {
    for part_id in extras.iter().filter_map(|extra| extra.part_id) {
        if tx.get_part(part_id)?.is_none() {
            return Err(PlowError::not_found("零件", part_id));
        }
    }
    Ok(())
}

/// 依成品庫存鍵扣減成品
fn reserve_finished_goods(tx: &mut dyn CatalogTx, items: &[ShipmentItem]) -> Result<()> {
    for (key, required) in InventoryKey::totals(items) {
        let stock = tx
            .get_inventory(&key)?
            .unwrap_or_else(|| InventoryItem::new(key, 0));
        if !stock.can_supply(required) {
            return Err(PlowError::InsufficientStock {
                key: key.to_string(),
                required,
                available: stock.quantity,
            });
        }
        tracing::debug!("預留成品 {} × {}", key, required);
        tx.set_inventory(key, stock.quantity - required)?;
    }
    Ok(())
}

/// 退回成品
fn restore_finished_goods(tx: &mut dyn CatalogTx, items: &[ShipmentItem]) -> Result<()> {
    for (key, quantity) in InventoryKey::totals(items) {
        let available = tx.get_inventory(&key)?.map_or(0, |item| item.quantity);
        let restored = available.checked_add(quantity).ok_or_else(|| {
            PlowError::Validation(format!("成品 {} 數量超出範圍", key))
        })?;
        tracing::debug!("退回成品 {} × {}", key, quantity);
        tx.set_inventory(key, restored)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{customer, fl540_key, item, seed, service, shipment, stock};
    use plow_core::{MovementFilter, PlowModel};
    use plow_ledger::PartQuantities;

    fn finished_goods(service: &PlowService<plow_store::MemoryDatabase>) -> i64 {
        service
            .list_inventory()
            .unwrap()
            .into_iter()
            .find(|i| i.key == fl540_key())
            .map_or(0, |i| i.quantity)
    }

    #[test]
    fn test_create_reserved_reserves_finished_goods_only() {
        let mut service = service();
        let part = seed(&mut service);

        let result = service.create_shipment(shipment(2)).unwrap();
        assert_eq!(result.shipment.status, ShipmentStatus::Reserved);
        assert!(result.reconcile.delta.is_empty());
        assert_eq!(finished_goods(&service), 3);
        assert_eq!(stock(&service, part), 100);
    }

    #[test]
    fn test_create_ready_consumes_parts() {
        let mut service = service();
        let part = seed(&mut service);

        let result = service
            .create_shipment(shipment(2).with_status(ShipmentStatus::Ready))
            .unwrap();
        assert_eq!(result.reconcile.delta, PartQuantities::from([(part, -6)]));
        assert_eq!(stock(&service, part), 94);
    }

    #[test]
    fn test_insufficient_finished_goods_aborts() {
        let mut service = service();
        let part = seed(&mut service);

        let err = service
            .create_shipment(shipment(6).with_status(ShipmentStatus::Ready))
            .unwrap_err();
        assert!(matches!(
            err,
            PlowError::InsufficientStock {
                required: 6,
                available: 5,
                ..
            }
        ));
        assert_eq!(finished_goods(&service), 5);
        assert_eq!(stock(&service, part), 100);
        assert!(service.list_shipments(None).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_extra_part_id_rejected() {
        let mut service = service();
        seed(&mut service);

        let request = shipment(1).with_extra(ShipmentExtraItem::for_part(404, 1));
        let err = service.create_shipment(request).unwrap_err();
        assert!(matches!(err, PlowError::NotFound { .. }));
    }

    #[test]
    fn test_status_round_trip_restores_stock() {
        let mut service = service();
        let part = seed(&mut service);
        let id = service.create_shipment(shipment(2)).unwrap().shipment.id;

        service.set_shipment_status(id, ShipmentStatus::Ready).unwrap();
        assert_eq!(stock(&service, part), 94);

        let again = service.set_shipment_status(id, ShipmentStatus::Ready).unwrap();
        assert!(again.reconcile.delta.is_empty());

        service.set_shipment_status(id, ShipmentStatus::Sent).unwrap();
        assert_eq!(stock(&service, part), 94);

        service.set_shipment_status(id, ShipmentStatus::Reserved).unwrap();
        assert_eq!(stock(&service, part), 100);
    }

    #[test]
    fn test_update_while_ready_applies_difference() {
        let mut service = service();
        let part = seed(&mut service);
        let id = service
            .create_shipment(shipment(2).with_status(ShipmentStatus::Ready))
            .unwrap()
            .shipment
            .id;

        let result = service.update_shipment(id, shipment(3)).unwrap();
        assert_eq!(result.shipment.status, ShipmentStatus::Ready);
        assert_eq!(result.reconcile.delta, PartQuantities::from([(part, -3)]));
        assert_eq!(stock(&service, part), 91);
        assert_eq!(finished_goods(&service), 2);
    }

    #[test]
    fn test_update_can_change_model_and_status() {
        let mut service = service();
        seed(&mut service);
        let id = service.create_shipment(shipment(2)).unwrap().shipment.id;

        let request = NewShipment::new(customer())
            .with_item(item(PlowModel::Fl540, 1, "B-9").with_bucket_holder(true))
            .with_notes("Abholung Montag")
            .with_status(ShipmentStatus::Sent);
        let result = service.update_shipment(id, request).unwrap();
        assert_eq!(result.shipment.status, ShipmentStatus::Sent);
        assert_eq!(result.shipment.notes.as_deref(), Some("Abholung Montag"));
        assert!(result.shipment.items[0].bucket_holder);
        assert_eq!(finished_goods(&service), 4);

        let activity = service.list_activity(Some("status"), None, None).unwrap();
        assert_eq!(activity.items.len(), 1);
    }

    #[test]
    fn test_delete_restores_everything() {
        let mut service = service();
        let part = seed(&mut service);
        let id = service
            .create_shipment(shipment(2).with_status(ShipmentStatus::Ready))
            .unwrap()
            .shipment
            .id;

        let outcome = service.delete_shipment(id).unwrap();
        assert_eq!(outcome.delta, PartQuantities::from([(part, 6)]));
        assert_eq!(stock(&service, part), 100);
        assert_eq!(finished_goods(&service), 5);
        assert!(matches!(
            service.get_shipment(id),
            Err(PlowError::NotFound { .. })
        ));

        let ledger = service
            .list_movements(&MovementFilter::for_shipment(id), None, None)
            .unwrap();
        assert_eq!(ledger.items.iter().map(|m| m.delta).sum::<i64>(), 0);
    }

    #[test]
    fn test_list_by_status() {
        let mut service = service();
        seed(&mut service);
        service.create_shipment(shipment(1)).unwrap();
        service
            .create_shipment(shipment(1).with_status(ShipmentStatus::Ready))
            .unwrap();

        assert_eq!(service.list_shipments(None).unwrap().len(), 2);
        assert_eq!(
            service
                .list_shipments(Some(ShipmentStatus::Ready))
                .unwrap()
                .len(),
            1
        );
    }
}
