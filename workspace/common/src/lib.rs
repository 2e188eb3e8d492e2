//! Shared domain vocabulary for the shipping backend: the canonical CSV
//! import fields, the header mapping type, and the zone-info DTO returned
//! by postal-code lookups. These shapes are used by both the batch import
//! core and the HTTP layer.

mod fields;

pub use fields::{CSV_FIELDS, CSV_FIELDS_OPTIONAL, CSV_FIELDS_REQUIRED, CsvField, HeaderMapping};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Zone/location metadata resolved from a postal code. Used to classify an
/// address for rate/zone purposes and to fill the derived address columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ZoneInfo {
    pub city: String,
    pub state: String,
    pub zone: String,
}
