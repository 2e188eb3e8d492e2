//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the shipping/package-management
//! application here: users own packages, every package owns a from/to
//! address pair, and transactions record billing history per package.

pub mod address;
pub mod package;
pub mod postal_zone;
pub mod transaction_record;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::address::Entity as Address;
    pub use super::package::Entity as Package;
    pub use super::postal_zone::Entity as PostalZone;
    pub use super::transaction_record::Entity as TransactionRecord;
    pub use super::user::Entity as User;
}
