use serde::Serialize;

use crate::packages::repo::Package;

/// Catalog entry as shown to API clients, with a 1-based display position
/// instead of the storage id.
#[derive(Debug, Serialize)]
pub struct PackageView {
    pub id: i64,
    pub hotel_name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub unit_cost: sqlx::types::Decimal,
    pub duration: i32,
}

#[derive(Debug, Serialize)]
pub struct PackageList {
    pub data: Vec<PackageView>,
}

impl PackageView {
    pub fn from_package(position: usize, package: Package) -> Self {
        Self {
            id: position as i64,
            hotel_name: package.hotel_name,
            image_url: package.image_url,
            description: package.description,
            unit_cost: package.unit_cost,
            duration: package.duration,
        }
    }
}
