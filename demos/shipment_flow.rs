//! 出貨流程範例
//!
//! 建立零件與 BOM，開一張出貨單並切換狀態，觀察零件庫存與異動帳本。
//! 以 `RUST_LOG=debug` 執行可看到對帳細節。

use chrono::NaiveDate;
use plow_core::{
    BomItem, BomKey, BomType, Customer, InventoryKey, MovementFilter, NewPart, NewShipment,
    PlowModel, ShipmentExtraItem, ShipmentItem, ShipmentStatus, ValveType, Variant,
};
use plowstock::{memory_service, LedgerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== 雪鏟出貨對帳範例 ===\n");

    let mut service = memory_service(LedgerConfig::new());

    // 步驟 1: 零件與 BOM
    println!("[1] 建立零件與 BOM");
    let blade = service.create_part(NewPart::new("Schar 540", 20))?;
    let bolt = service.create_part(NewPart::new("Schraube M12", 200))?;
    let valve = service.create_part(NewPart::new("Ventil 6/2", 4))?;
    let mount = service.create_part(NewPart::new("Schwenkbock 3000", 3))?;

    service.replace_bom(
        BomKey::for_model(PlowModel::Fl540, BomType::Standard),
        vec![BomItem::new(blade.id, 1), BomItem::new(bolt.id, 12)],
    )?;
    service.replace_bom(
        BomKey::for_model(PlowModel::Fl540, BomType::Addon62),
        vec![BomItem::new(valve.id, 1)],
    )?;
    service.replace_bom(
        BomKey::global(BomType::Schwenkbock3000),
        vec![BomItem::new(mount.id, 1)],
    )?;

    // 步驟 2: 成品庫存
    println!("[2] 入庫成品");
    let key = InventoryKey::new(PlowModel::Fl540, 3, Variant::Orange, true);
    service.adjust_inventory(key, 4)?;
    println!("    {}: 4 台", key);

    // 步驟 3: 出貨單
    println!("[3] 建立出貨單（RESERVED）");
    let item = ShipmentItem::new(
        PlowModel::Fl540,
        3,
        Variant::Orange,
        2,
        "B-2025-041".to_string(),
        NaiveDate::from_ymd_opt(2025, 10, 20).ok_or("invalid date")?,
    )
    .with_schwenkbock(true)
    .with_valve_type(ValveType::Small)
    .with_bucket_holder(true);

    let customer = Customer {
        company_name: "Bauhof Zell".to_string(),
        first_name: "Anna".to_string(),
        last_name: "Huber".to_string(),
        street: "Dorfstraße 1".to_string(),
        postal_code: "5700".to_string(),
        city: "Zell am See".to_string(),
        country: "AT".to_string(),
    };
    let request = NewShipment::new(customer)
        .with_notes("Lieferung vor Saisonbeginn")
        .with_item(item)
        .with_extra(ShipmentExtraItem::named("schraube m12", 8))
        .with_extra(ShipmentExtraItem::named("Warnflagge", 2));
    let created = service.create_shipment(request)?;
    let shipment_id = created.shipment.id;
    println!("    出貨單 #{}", shipment_id);

    // 步驟 4: READY
    println!("[4] 切換為 READY");
    let ready = service.set_shipment_status(shipment_id, ShipmentStatus::Ready)?;
    if let Some(summary) = &ready.reconcile.summary {
        println!("    需求: {:?}", summary.required_by_part_id);
        println!("    缺少 BOM: {:?}", summary.missing_bom);
        println!("    未對應額外零件: {:?}", summary.unmatched_extras);
    }
    println!("    差額: {:?}", ready.reconcile.delta);
    for warning in ready.stock_warnings() {
        println!("    ⚠ {} 庫存為負: {}", warning.name, warning.stock);
    }

    // 步驟 5: 再次 READY 不會重複扣料
    println!("[5] 再次 READY");
    let again = service.set_shipment_status(shipment_id, ShipmentStatus::Ready)?;
    println!("    差額: {:?}", again.reconcile.delta);

    // 步驟 6: 退回 RESERVED
    println!("[6] 退回 RESERVED");
    let rollback = service.set_shipment_status(shipment_id, ShipmentStatus::Reserved)?;
    println!("    差額: {:?}", rollback.reconcile.delta);

    println!("\n=== 零件庫存 ===");
    for part in service.search_parts("", None, None)?.items {
        println!("  {:<20} {:>5} {}", part.name, part.stock, part.unit);
    }

    println!("\n=== 異動帳本 ===");
    let ledger = service.list_movements(&MovementFilter::for_shipment(shipment_id), None, None)?;
    for movement in ledger.items {
        println!(
            "  #{:<3} 零件 {:<3} {:>+5} {:?}",
            movement.id, movement.part_id, movement.delta, movement.reason
        );
    }

    Ok(())
}
