pub mod health;
pub mod import;
pub mod packages;
pub mod postal_zones;
pub mod transactions;
pub mod users;
