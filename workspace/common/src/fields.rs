use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A canonical import field. Every CSV row is normalized into exactly this
/// set of attributes, regardless of how the source file names its columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum CsvField {
    Weight,
    Reference,
    FromName,
    FromAddressZip,
    FromAddress1,
    ToName,
    ToAddressZip,
    ToAddress1,
    TrackingNo,
    Length,
    Width,
    Height,
    FromAddress2,
    ToAddress2,
}

/// Fields a row must carry to be importable.
pub const CSV_FIELDS_REQUIRED: [CsvField; 8] = [
    CsvField::Weight,
    CsvField::Reference,
    CsvField::FromName,
    CsvField::FromAddressZip,
    CsvField::FromAddress1,
    CsvField::ToName,
    CsvField::ToAddressZip,
    CsvField::ToAddress1,
];

/// Fields that may be absent; persistence fills defaults where needed.
pub const CSV_FIELDS_OPTIONAL: [CsvField; 6] = [
    CsvField::TrackingNo,
    CsvField::Length,
    CsvField::Width,
    CsvField::Height,
    CsvField::FromAddress2,
    CsvField::ToAddress2,
];

/// All canonical fields, required first.
pub const CSV_FIELDS: [CsvField; 14] = [
    CsvField::Weight,
    CsvField::Reference,
    CsvField::FromName,
    CsvField::FromAddressZip,
    CsvField::FromAddress1,
    CsvField::ToName,
    CsvField::ToAddressZip,
    CsvField::ToAddress1,
    CsvField::TrackingNo,
    CsvField::Length,
    CsvField::Width,
    CsvField::Height,
    CsvField::FromAddress2,
    CsvField::ToAddress2,
];

impl CsvField {
    /// The canonical (camelCase) name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            CsvField::Weight => "weight",
            CsvField::Reference => "reference",
            CsvField::FromName => "fromName",
            CsvField::FromAddressZip => "fromAddressZip",
            CsvField::FromAddress1 => "fromAddress1",
            CsvField::ToName => "toName",
            CsvField::ToAddressZip => "toAddressZip",
            CsvField::ToAddress1 => "toAddress1",
            CsvField::TrackingNo => "trackingNo",
            CsvField::Length => "length",
            CsvField::Width => "width",
            CsvField::Height => "height",
            CsvField::FromAddress2 => "fromAddress2",
            CsvField::ToAddress2 => "toAddress2",
        }
    }

    pub fn is_required(self) -> bool {
        CSV_FIELDS_REQUIRED.contains(&self)
    }
}

impl fmt::Display for CsvField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps each canonical field to the source-column name to read it from.
/// Fields without an entry are unmapped and read as null.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct HeaderMapping {
    columns: BTreeMap<CsvField, String>,
}

impl HeaderMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in mapping used when an import job supplies none (or a
    /// malformed one). Column names match the headers of the stock
    /// shipment-export template.
    pub fn builtin() -> Self {
        let mut mapping = Self::new();
        mapping.set(CsvField::Weight, "Weight");
        mapping.set(CsvField::Reference, "Reference");
        mapping.set(CsvField::FromName, "From Name");
        mapping.set(CsvField::FromAddressZip, "From Zip");
        mapping.set(CsvField::FromAddress1, "From Address 1");
        mapping.set(CsvField::ToName, "To Name");
        mapping.set(CsvField::ToAddressZip, "To Zip");
        mapping.set(CsvField::ToAddress1, "To Address 1");
        mapping.set(CsvField::TrackingNo, "Tracking Number");
        mapping.set(CsvField::Length, "Length");
        mapping.set(CsvField::Width, "Width");
        mapping.set(CsvField::Height, "Height");
        mapping.set(CsvField::FromAddress2, "From Address 2");
        mapping.set(CsvField::ToAddress2, "To Address 2");
        mapping
    }

    pub fn set(&mut self, field: CsvField, column: impl Into<String>) {
        self.columns.insert(field, column.into());
    }

    /// The source column mapped to `field`, or `None` when unmapped.
    pub fn column_for(&self, field: CsvField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip_through_serde() {
        for field in CSV_FIELDS {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
            let back: CsvField = serde_json::from_str(&json).unwrap();
            assert_eq!(back, field);
        }
    }

    #[test]
    fn required_and_optional_partition_all_fields() {
        assert_eq!(
            CSV_FIELDS_REQUIRED.len() + CSV_FIELDS_OPTIONAL.len(),
            CSV_FIELDS.len()
        );
        for field in CSV_FIELDS_REQUIRED {
            assert!(field.is_required());
        }
        for field in CSV_FIELDS_OPTIONAL {
            assert!(!field.is_required());
        }
    }

    #[test]
    fn builtin_mapping_covers_every_field() {
        let mapping = HeaderMapping::builtin();
        for field in CSV_FIELDS {
            assert!(mapping.column_for(field).is_some(), "{field} unmapped");
        }
    }
}
