//! 套用差額

use plow_core::{LedgerTx, NewPartMovement, Result, ShipmentId};

use crate::{PartQuantities, StockWarning};

/// 套用差額：更新零件庫存並寫入異動
///
/// 負差額記為 READY_SHIPMENT，正差額記為 ROLLBACK_SHIPMENT。庫存允許變成負數，
/// 此時回傳警告而非錯誤。
pub fn apply_shipment_part_deltas<T: LedgerTx + ?Sized>(
    tx: &mut T,
    shipment_id: ShipmentId,
    delta_by_part_id: &PartQuantities,
) -> Result<Vec<StockWarning>> {
    let mut warnings = Vec::new();

    for (&part_id, &delta) in delta_by_part_id {
        if delta == 0 {
            continue;
        }

        let updated = tx.increment_part_stock(part_id, delta)?;
        tx.append_movement(NewPartMovement::shipment(part_id, delta, shipment_id))?;

        if updated.is_oversold() {
            tracing::warn!(
                "零件 {}（{}）庫存為負: {}",
                updated.id,
                updated.name,
                updated.stock
            );
            warnings.push(StockWarning::new(updated.id, updated.name, updated.stock));
        }
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seed_part;
    use plow_core::{CatalogTx, Database, MovementFilter, MovementReason};
    use plow_store::MemoryDatabase;

    #[test]
    fn test_apply_writes_stock_and_ledger() {
        let db = MemoryDatabase::new();
        db.transaction(|tx| {
            let a = seed_part(tx, "Schar", 10)?;
            let b = seed_part(tx, "Kufe", 10)?;
            let delta: PartQuantities = [(a, -6), (b, 2)].into_iter().collect();

            let warnings = apply_shipment_part_deltas(tx, 7, &delta)?;
            assert!(warnings.is_empty());

            assert_eq!(tx.get_part(a)?.map(|p| p.stock), Some(4));
            assert_eq!(tx.get_part(b)?.map(|p| p.stock), Some(12));

            let ready = tx.list_movements(
                &MovementFilter::for_shipment(7).with_reason(MovementReason::ReadyShipment),
            )?;
            let rollback = tx.list_movements(
                &MovementFilter::for_shipment(7).with_reason(MovementReason::RollbackShipment),
            )?;
            assert_eq!(ready.len(), 1);
            assert_eq!(ready[0].delta, -6);
            assert_eq!(rollback.len(), 1);
            assert_eq!(rollback[0].part_id, b);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_negative_stock_is_warning_not_error() {
        let db = MemoryDatabase::new();
        db.transaction(|tx| {
            let a = seed_part(tx, "Hydraulikpumpe", 1)?;
            let delta: PartQuantities = [(a, -3)].into_iter().collect();

            let warnings = apply_shipment_part_deltas(tx, 1, &delta)?;
            assert_eq!(warnings, vec![StockWarning::new(a, "Hydraulikpumpe".to_string(), -2)]);
            assert_eq!(tx.get_part(a)?.map(|p| p.stock), Some(-2));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_zero_delta_skipped() {
        let db = MemoryDatabase::new();
        db.transaction(|tx| {
            let a = seed_part(tx, "Schar", 10)?;
            let delta: PartQuantities = [(a, 0)].into_iter().collect();
            apply_shipment_part_deltas(tx, 1, &delta)?;
            assert!(tx.list_movements(&MovementFilter::default())?.is_empty());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_unknown_part_fails() {
        let db = MemoryDatabase::new();
        let result = db.transaction(|tx| {
            let delta: PartQuantities = [(404, -1)].into_iter().collect();
            apply_shipment_part_deltas(tx, 1, &delta)
        });
        assert!(result.is_err());
    }
}
