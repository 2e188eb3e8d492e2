//! CSV batch-import core for the shipping backend.
//!
//! The pipeline runs in three stages: resolve the header mapping
//! ([`mapping`]), normalize each raw row into a package plus its from/to
//! address pair ([`normalize`], skipping rows whose postal codes do not
//! resolve), and persist the accumulated batch in one transaction
//! ([`persist`]). [`tracking`] generates carrier tracking numbers and
//! [`zones`] wraps the postal-zone lookup.

pub mod error;
pub mod mapping;
pub mod normalize;
pub mod persist;
pub mod reader;
pub mod tracking;
pub mod zones;

pub use error::{ImportError, Result};
