use sea_orm::entity::prelude::*;

/// Postal-code reference data: resolves a zip code to its city, state and
/// sort zone. Read-only from the application's point of view.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "postal_zones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub zone: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
