use common::ZoneInfo;
use model::entities::postal_zone;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::error::Result;

/// Resolve a postal code to its zone/location row, or `None` when the code
/// is unknown.
pub async fn lookup_zone(
    db: &DatabaseConnection,
    zip: &str,
) -> Result<Option<postal_zone::Model>> {
    let found = postal_zone::Entity::find()
        .filter(postal_zone::Column::ZipCode.eq(zip))
        .one(db)
        .await?;
    Ok(found)
}

/// Project a postal-zone row into the transport DTO.
pub fn zone_info(model: &postal_zone::Model) -> ZoneInfo {
    ZoneInfo {
        city: model.city.clone(),
        state: model.state.clone(),
        zone: model.zone.clone(),
    }
}
