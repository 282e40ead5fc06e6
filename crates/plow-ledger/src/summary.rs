//! 需求彙總

use plow_core::{
    Bom, BomKey, LedgerConfig, LedgerTx, PlowError, Result, ShipmentExtraItem, ShipmentItem,
};
use std::collections::{BTreeSet, HashMap};

use crate::bom_lookup::required_bom_keys;
use crate::PartsSummary;

/// 計算出貨單的零件需求
///
/// 每筆明細依適用的 BOM 行累加 `qty_per_unit × quantity`；額外零件優先使用
/// `part_id`，否則以名稱（不分大小寫）比對零件目錄。找不到的 BOM 與名稱
/// 只記錄在結果中，不視為錯誤。
pub fn build_parts_summary<T: LedgerTx + ?Sized>(
    tx: &T,
    config: &LedgerConfig,
    items: &[ShipmentItem],
    extras: &[ShipmentExtraItem],
) -> Result<PartsSummary> {
    let mut summary = PartsSummary::default();

    // Step 1: 一次查出所有需要的 BOM
    let item_keys: Vec<Vec<BomKey>> = items
        .iter()
        .map(|item| required_bom_keys(item, config))
        .collect();
    let unique_keys: Vec<BomKey> = item_keys
        .iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let bom_lookup: HashMap<BomKey, Bom> = if unique_keys.is_empty() {
        HashMap::new()
    } else {
        tx.find_boms(&unique_keys)?
            .into_iter()
            .map(|bom| (bom.key(), bom))
            .collect()
    };
    tracing::debug!("需要 BOM {} 組，找到 {} 組", unique_keys.len(), bom_lookup.len());

    // Step 2: BOM 展開
    for (item, keys) in items.iter().zip(&item_keys) {
        for key in keys {
            match bom_lookup.get(key) {
                Some(bom) => {
                    for line in &bom.items {
                        let quantity =
                            line.qty_per_unit.checked_mul(item.quantity).ok_or_else(|| {
                                PlowError::Validation(format!(
                                    "BOM {} 零件 {} 用量 × {} 台超出範圍",
                                    key, line.part_id, item.quantity
                                ))
                            })?;
                        summary.add_requirement(line.part_id, quantity)?;
                    }
                }
                None => summary.add_missing_bom(key.clone()),
            }
        }
    }

    // Step 3: 額外零件
    let names: Vec<String> = extras
        .iter()
        .filter(|extra| extra.part_id.is_none())
        .filter_map(|extra| extra.name.clone())
        .collect();

    let part_by_name: HashMap<String, i64> = if names.is_empty() {
        HashMap::new()
    } else {
        tx.find_parts_by_names(&names)?
            .into_iter()
            .map(|part| (part.name.to_lowercase(), part.id))
            .collect()
    };

    for extra in extras {
        let part_id = extra.part_id.or_else(|| {
            extra
                .name
                .as_ref()
                .and_then(|name| part_by_name.get(&name.to_lowercase()).copied())
        });

        match part_id {
            Some(part_id) => summary.add_requirement(part_id, extra.quantity)?,
            None => {
                if let Some(name) = &extra.name {
                    summary.unmatched_extras.push(name.clone());
                }
            }
        }
    }

    if !summary.missing_bom.is_empty() {
        tracing::warn!("缺少 BOM: {:?}", summary.missing_bom);
    }
    if !summary.unmatched_extras.is_empty() {
        tracing::warn!("無法對應的額外零件: {:?}", summary.unmatched_extras);
    }

    Ok(summary)
}
