//! 出貨狀態對帳器

use plow_core::{LedgerConfig, LedgerTx, Result, Shipment, ShipmentId, ShipmentStatus};

use crate::{
    apply_shipment_part_deltas, build_parts_summary, calculate_shipment_delta, PartQuantities,
    ReconcileOutcome,
};

/// 依出貨狀態決定零件帳本應有的樣子並套用差額
///
/// - READY：依目前明細完整對帳
/// - RESERVED：需求視為空，退回所有已扣庫存
/// - SENT：不動庫存
///
/// 狀態轉換是否合法由呼叫端決定，這裡不拒絕任何狀態。
pub struct Reconciler<'a> {
    config: &'a LedgerConfig,
}

impl<'a> Reconciler<'a> {
    /// 創建新的對帳器
    pub fn new(config: &'a LedgerConfig) -> Self {
        Self { config }
    }

    /// 依出貨單目前狀態對帳
    pub fn reconcile<T: LedgerTx + ?Sized>(
        &self,
        tx: &mut T,
        shipment: &Shipment,
    ) -> Result<ReconcileOutcome> {
        tracing::info!("開始對帳：出貨單 {}，狀態 {}", shipment.id, shipment.status);

        let outcome = match shipment.status {
            ShipmentStatus::Ready => {
                let summary =
                    build_parts_summary(&*tx, self.config, &shipment.items, &shipment.extras)?;
                let delta =
                    calculate_shipment_delta(&*tx, shipment.id, &summary.required_by_part_id)?;
                let warnings = apply_shipment_part_deltas(tx, shipment.id, &delta)?;
                ReconcileOutcome {
                    status: shipment.status,
                    summary: Some(summary),
                    delta,
                    warnings,
                }
            }
            ShipmentStatus::Reserved => self.rollback(tx, shipment.id)?,
            ShipmentStatus::Sent => ReconcileOutcome::untouched(ShipmentStatus::Sent),
        };

        tracing::info!(
            "對帳完成：出貨單 {}，異動 {} 項，負庫存警告 {} 項",
            shipment.id,
            outcome.delta.len(),
            outcome.warnings.len()
        );

        Ok(outcome)
    }

    /// 退回出貨單已套用的全部零件
    pub fn rollback<T: LedgerTx + ?Sized>(
        &self,
        tx: &mut T,
        shipment_id: ShipmentId,
    ) -> Result<ReconcileOutcome> {
        let delta = calculate_shipment_delta(&*tx, shipment_id, &PartQuantities::new())?;
        let warnings = apply_shipment_part_deltas(tx, shipment_id, &delta)?;
        Ok(ReconcileOutcome {
            status: ShipmentStatus::Reserved,
            summary: None,
            delta,
            warnings,
        })
    }
}
