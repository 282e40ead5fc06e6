use chrono::NaiveDate;
use plow_core::{
    BomItem, BomKey, BomType, CatalogTx, Customer, Database, InventoryKey, LedgerConfig, NewPart,
    NewShipment, PartId, PlowModel, ShipmentItem, Variant,
};
use plow_store::MemoryDatabase;

use crate::PlowService;

pub fn service() -> PlowService<MemoryDatabase> {
    PlowService::new(MemoryDatabase::new(), LedgerConfig::new())
}

pub fn customer() -> Customer {
    Customer {
        company_name: "Bauhof Zell".to_string(),
        first_name: "Anna".to_string(),
        last_name: "Huber".to_string(),
        street: "Dorfstraße 1".to_string(),
        postal_code: "5700".to_string(),
        city: "Zell am See".to_string(),
        country: "AT".to_string(),
    }
}

pub fn item(model: PlowModel, quantity: i64, build_number: &str) -> ShipmentItem {
    ShipmentItem::new(
        model,
        7,
        Variant::Orange,
        quantity,
        build_number.to_string(),
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
    )
}

pub fn shipment(quantity: i64) -> NewShipment {
    NewShipment::new(customer()).with_item(item(PlowModel::Fl540, quantity, "B-1"))
}

pub fn fl540_key() -> InventoryKey {
    InventoryKey::new(PlowModel::Fl540, 7, Variant::Orange, false)
}

/// 零件 Schar（庫存 100），FL 540 STANDARD = [Schar × 3]，成品庫存 5 台
pub fn seed(service: &mut PlowService<MemoryDatabase>) -> PartId {
    let part = service.create_part(NewPart::new("Schar", 100)).unwrap();
    service
        .replace_bom(
            BomKey::for_model(PlowModel::Fl540, BomType::Standard),
            vec![BomItem::new(part.id, 3)],
        )
        .unwrap();
    service.adjust_inventory(fl540_key(), 5).unwrap();
    part.id
}

pub fn stock(service: &PlowService<MemoryDatabase>, part_id: PartId) -> i64 {
    service
        .database()
        .transaction(|tx| Ok(tx.get_part(part_id)?.map(|p| p.stock)))
        .unwrap()
        .unwrap()
}
