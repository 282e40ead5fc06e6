//! 差額計算

use plow_core::{LedgerTx, PartMovement, Result, ShipmentId};
use std::collections::BTreeSet;

use crate::PartQuantities;

/// 已套用到出貨單的異動總和（只計 READY_SHIPMENT / ROLLBACK_SHIPMENT）
pub fn applied_by_part(movements: &[PartMovement]) -> PartQuantities {
    let mut applied = PartQuantities::new();
    for movement in movements.iter().filter(|m| m.reason.is_shipment()) {
        *applied.entry(movement.part_id).or_insert(0) += movement.delta;
    }
    applied
}

/// 讓已套用量達到 `-required` 所需的差額
///
/// 包含已不再需要的零件（需求 0），以便退回先前扣的庫存；差額為 0 的零件不輸出。
pub fn diff_requirements(required: &PartQuantities, applied: &PartQuantities) -> PartQuantities {
    let part_ids: BTreeSet<_> = required.keys().chain(applied.keys()).copied().collect();

    part_ids
        .into_iter()
        .filter_map(|part_id| {
            let desired = -required.get(&part_id).copied().unwrap_or(0);
            let current = applied.get(&part_id).copied().unwrap_or(0);
            let delta = desired - current;
            (delta != 0).then_some((part_id, delta))
        })
        .collect()
}

/// 計算出貨單需要套用的差額
pub fn calculate_shipment_delta<T: LedgerTx + ?Sized>(
    tx: &T,
    shipment_id: ShipmentId,
    required: &PartQuantities,
) -> Result<PartQuantities> {
    let movements = tx.shipment_movements(shipment_id)?;
    let applied = applied_by_part(&movements);
    let delta = diff_requirements(required, &applied);

    tracing::debug!(
        "出貨單 {} 差額計算：需求 {} 項，已套用 {} 項，差額 {} 項",
        shipment_id,
        required.len(),
        applied.len(),
        delta.len()
    );

    Ok(delta)
}
