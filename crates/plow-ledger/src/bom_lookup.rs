//! BOM 查找規則

use plow_core::{BomKey, BomType, LedgerConfig, ShipmentItem};

/// 出貨明細需要的 BOM 鍵
///
/// - 一律需要 (型號, STANDARD)
/// - 帶 6/2 閥組：加上 (型號, ADDON_6_2)
/// - Schwenkbock：加上 (GLOBAL, SCHWENKBOCK_3000) 或 (GLOBAL, SCHWENKBOCK_2000)
pub fn required_bom_keys(item: &ShipmentItem, config: &LedgerConfig) -> Vec<BomKey> {
    let mut keys = vec![BomKey::for_model(item.model, BomType::Standard)];

    if item.valve_type.has_valve() {
        keys.push(BomKey::for_model(item.model, BomType::Addon62));
    }

    if item.is_schwenkbock {
        let mount = if config.uses_schwenkbock_3000(item.model) {
            BomType::Schwenkbock3000
        } else {
            BomType::Schwenkbock2000
        };
        keys.push(BomKey::global(mount));
    }

    keys
}
