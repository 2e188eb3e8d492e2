use super::user;
use sea_orm::entity::prelude::*;

/// How a package entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum PackageSource {
    /// Created one at a time through the API.
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Created by a CSV batch import.
    #[sea_orm(string_value = "batch")]
    Batch,
}

impl PackageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Batch => "batch",
        }
    }
}

/// A shipment. Every package owns exactly one from-address and one
/// to-address, linked back to it through the addresses' typed foreign keys.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "packages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The user who owns this package.
    pub user_id: i32,
    /// Carrier tracking number. Unique across all packages; generated when
    /// the caller does not supply one.
    #[sea_orm(unique)]
    pub tracking_no: String,
    /// Caller-supplied reference, e.g. an order number.
    pub reference_no: Option<String>,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Weight is always present; dimensions default to zero.
    pub weight: f64,
    pub source: PackageSource,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A package belongs to one owner.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::transaction_record::Entity")]
    TransactionRecord,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transaction_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
