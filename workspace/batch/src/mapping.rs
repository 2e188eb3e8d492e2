use std::collections::{BTreeMap, HashMap};

use common::{CSV_FIELDS, CsvField, HeaderMapping};
use serde_json::Value;
use tracing::debug;

/// One raw CSV row: source column name to cell value. Empty cells are
/// absent from the map.
pub type CsvRow = HashMap<String, String>;

/// A row projected onto the canonical field set. Fields that were unmapped,
/// or mapped to a column the row does not carry, are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedRecord {
    values: BTreeMap<CsvField, String>,
}

impl MappedRecord {
    pub fn get(&self, field: CsvField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Parse a numeric field; `None` when absent or not a number.
    pub fn get_f64(&self, field: CsvField) -> Option<f64> {
        self.get(field).and_then(|v| v.parse().ok())
    }

    fn insert(&mut self, field: CsvField, value: String) {
        self.values.insert(field, value);
    }
}

/// Resolve the header mapping for an import job.
///
/// A valid JSON object is taken as the mapping: known canonical keys with
/// string values are used, everything else is ignored. Absent or malformed
/// input silently degrades to the built-in default mapping; this never
/// fails.
pub fn resolve_header_mapping(raw: Option<&str>) -> HeaderMapping {
    let Some(text) = raw else {
        return HeaderMapping::builtin();
    };

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(entries)) => {
            let mut mapping = HeaderMapping::new();
            for (key, value) in entries {
                let Ok(field) = serde_json::from_value::<CsvField>(Value::String(key.clone()))
                else {
                    debug!("ignoring unknown mapping key: {key}");
                    continue;
                };
                if let Value::String(column) = value {
                    mapping.set(field, column);
                }
            }
            mapping
        }
        _ => {
            debug!("header mapping is not a JSON object, using builtin mapping");
            HeaderMapping::builtin()
        }
    }
}

/// Project one raw row onto the canonical fields via the resolved mapping.
/// Whitespace-only cells count as absent.
pub fn map_row(row: &CsvRow, mapping: &HeaderMapping) -> MappedRecord {
    let mut record = MappedRecord::default();
    for field in CSV_FIELDS {
        let Some(column) = mapping.column_for(field) else {
            continue;
        };
        if let Some(value) = row.get(column) {
            let value = value.trim();
            if !value.is_empty() {
                record.insert(field, value.to_string());
            }
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn valid_mapping_json_is_used() {
        let mapping =
            resolve_header_mapping(Some(r#"{"weight": "Wt (lbs)", "toAddressZip": "Dest Zip"}"#));
        assert_eq!(mapping.column_for(CsvField::Weight), Some("Wt (lbs)"));
        assert_eq!(mapping.column_for(CsvField::ToAddressZip), Some("Dest Zip"));
        // Unlisted fields stay unmapped
        assert_eq!(mapping.column_for(CsvField::FromName), None);
    }

    #[test]
    fn unknown_keys_and_null_values_are_ignored() {
        let mapping = resolve_header_mapping(Some(
            r#"{"weight": "Wt", "warpDrive": "X", "length": null}"#,
        ));
        assert_eq!(mapping.column_for(CsvField::Weight), Some("Wt"));
        assert_eq!(mapping.column_for(CsvField::Length), None);
    }

    #[test]
    fn malformed_json_degrades_to_builtin() {
        let mapping = resolve_header_mapping(Some("{not json"));
        assert_eq!(mapping, HeaderMapping::builtin());
    }

    #[test]
    fn non_object_json_degrades_to_builtin() {
        assert_eq!(resolve_header_mapping(Some("42")), HeaderMapping::builtin());
        assert_eq!(
            resolve_header_mapping(Some("[\"weight\"]")),
            HeaderMapping::builtin()
        );
    }

    #[test]
    fn absent_spec_degrades_to_builtin() {
        assert_eq!(resolve_header_mapping(None), HeaderMapping::builtin());
    }

    #[test]
    fn map_row_reads_mapped_columns_and_nulls_the_rest() {
        let mapping = resolve_header_mapping(Some(r#"{"weight": "Wt", "fromName": "Sender"}"#));
        let record = map_row(&row(&[("Wt", "3.5"), ("Sender", "Acme"), ("Extra", "x")]), &mapping);
        assert_eq!(record.get(CsvField::Weight), Some("3.5"));
        assert_eq!(record.get_f64(CsvField::Weight), Some(3.5));
        assert_eq!(record.get(CsvField::FromName), Some("Acme"));
        for field in [CsvField::ToName, CsvField::Length, CsvField::TrackingNo] {
            assert_eq!(record.get(field), None);
        }
    }

    #[test]
    fn blank_cells_read_as_null() {
        let mapping = resolve_header_mapping(Some(r#"{"reference": "Ref"}"#));
        let record = map_row(&row(&[("Ref", "   ")]), &mapping);
        assert_eq!(record.get(CsvField::Reference), None);
    }
}
