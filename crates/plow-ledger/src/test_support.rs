//! 測試輔助

use chrono::NaiveDate;
use plow_core::{CatalogTx, Customer, NewPart, PartId, PlowModel, Result, ShipmentItem, Variant};

pub fn seed_part(tx: &mut dyn CatalogTx, name: &str, stock: i64) -> Result<PartId> {
    Ok(tx.insert_part(NewPart::new(name, stock), "pcs")?.id)
}

pub fn item(model: PlowModel, quantity: i64, build_number: &str) -> ShipmentItem {
    ShipmentItem::new(
        model,
        1,
        Variant::Zinc,
        quantity,
        build_number.to_string(),
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
    )
}

pub fn customer() -> Customer {
    Customer {
        company_name: "Gemeinde Altdorf".to_string(),
        first_name: "Anna".to_string(),
        last_name: "Muster".to_string(),
        street: "Dorfstrasse 1".to_string(),
        postal_code: "6460".to_string(),
        city: "Altdorf".to_string(),
        country: "CH".to_string(),
    }
}
