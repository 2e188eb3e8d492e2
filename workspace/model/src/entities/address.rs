use sea_orm::entity::prelude::*;

/// Which side of a shipment an address belongs to. The type tag determines
/// which package link field is populated; the other must stay NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")]
pub enum AddressType {
    #[sea_orm(string_value = "from_package")]
    FromPackage,
    #[sea_orm(string_value = "to_package")]
    ToPackage,
}

/// A shipping address attached to exactly one package. Addresses are never
/// created independently of a package and are deleted together with it.
/// City/state/zone are derived from the postal-zone table at write time.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub address_type: AddressType,
    /// Recipient or sender name.
    pub name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// Sort zone derived from the postal-zone lookup.
    pub zone: Option<String>,
    /// Set when `address_type` is `FromPackage`.
    pub from_package_id: Option<i32>,
    /// Set when `address_type` is `ToPackage`.
    pub to_package_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::package::Entity",
        from = "Column::FromPackageId",
        to = "super::package::Column::Id"
    )]
    FromPackage,
    #[sea_orm(
        belongs_to = "super::package::Entity",
        from = "Column::ToPackageId",
        to = "super::package::Column::Id"
    )]
    ToPackage,
}

// No `Related<package::Entity>` impl: the link is ambiguous (two foreign
// keys). Callers filter on the link column that matches the type tag.

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
