use chrono::Utc;
use common::{CSV_FIELDS_REQUIRED, CsvField, HeaderMapping, ZoneInfo};
use model::entities::{address, package};
use sea_orm::{DatabaseConnection, Set};
use tracing::{error, instrument};

use crate::error::Result;
use crate::mapping::{CsvRow, MappedRecord, map_row};
use crate::tracking::generate_tracking_no;
use crate::zones::{lookup_zone, zone_info};

/// One import row normalized into canonical fields plus the resolved
/// zone/location metadata for both sides of the shipment.
#[derive(Debug, Clone)]
pub struct PreparedRecord {
    pub mapped: MappedRecord,
    pub from_zone: ZoneInfo,
    pub to_zone: ZoneInfo,
}

/// Normalize one raw CSV row.
///
/// Returns `Ok(None)` when the row must be skipped: a required field is
/// missing, the weight is not numeric, or either postal code fails to
/// resolve. Each skip logs a diagnostic naming the offending field or
/// code. Database errors propagate; a skip never aborts the batch.
#[instrument(skip(db, row, mapping))]
pub async fn prepare_record(
    db: &DatabaseConnection,
    row: &CsvRow,
    mapping: &HeaderMapping,
) -> Result<Option<PreparedRecord>> {
    let mapped = map_row(row, mapping);

    for field in CSV_FIELDS_REQUIRED {
        if mapped.get(field).is_none() {
            error!("row skipped: required field {field} is missing");
            return Ok(None);
        }
    }
    if mapped.get_f64(CsvField::Weight).is_none() {
        error!(
            "row skipped: weight {:?} is not numeric",
            mapped.get(CsvField::Weight)
        );
        return Ok(None);
    }

    let from_zip = mapped.get(CsvField::FromAddressZip).unwrap_or_default();
    let Some(from) = lookup_zone(db, from_zip).await? else {
        error!("has no From ZipInfo for fromAddressZip: {from_zip}");
        return Ok(None);
    };

    let to_zip = mapped.get(CsvField::ToAddressZip).unwrap_or_default();
    let Some(to) = lookup_zone(db, to_zip).await? else {
        error!("has no To ZipInfo for toAddressZip: {to_zip}");
        return Ok(None);
    };

    Ok(Some(PreparedRecord {
        mapped,
        from_zone: zone_info(&from),
        to_zone: zone_info(&to),
    }))
}

impl PreparedRecord {
    /// Build the package and from/to address records for the persistence
    /// coordinator. Dimensions default to zero, the tracking number is
    /// generated when absent, and the address link fields stay unset until
    /// the coordinator stamps the generated package ids.
    pub fn into_models(
        self,
        user_id: i32,
    ) -> (
        package::ActiveModel,
        address::ActiveModel,
        address::ActiveModel,
    ) {
        let tracking_no = self
            .mapped
            .get(CsvField::TrackingNo)
            .map(str::to_string)
            .unwrap_or_else(generate_tracking_no);

        let pkg = package::ActiveModel {
            user_id: Set(user_id),
            tracking_no: Set(tracking_no),
            reference_no: Set(self.mapped.get(CsvField::Reference).map(str::to_string)),
            length: Set(self.mapped.get_f64(CsvField::Length).unwrap_or(0.0)),
            width: Set(self.mapped.get_f64(CsvField::Width).unwrap_or(0.0)),
            height: Set(self.mapped.get_f64(CsvField::Height).unwrap_or(0.0)),
            weight: Set(self.mapped.get_f64(CsvField::Weight).unwrap_or(0.0)),
            source: Set(package::PackageSource::Batch),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let ship_from = address::ActiveModel {
            user_id: Set(user_id),
            address_type: Set(address::AddressType::FromPackage),
            name: Set(field_string(&self.mapped, CsvField::FromName)),
            address1: Set(field_string(&self.mapped, CsvField::FromAddress1)),
            address2: Set(self.mapped.get(CsvField::FromAddress2).map(str::to_string)),
            city: Set(self.from_zone.city),
            state: Set(self.from_zone.state),
            zip: Set(field_string(&self.mapped, CsvField::FromAddressZip)),
            zone: Set(Some(self.from_zone.zone)),
            from_package_id: Set(None),
            to_package_id: Set(None),
            ..Default::default()
        };

        let ship_to = address::ActiveModel {
            user_id: Set(user_id),
            address_type: Set(address::AddressType::ToPackage),
            name: Set(field_string(&self.mapped, CsvField::ToName)),
            address1: Set(field_string(&self.mapped, CsvField::ToAddress1)),
            address2: Set(self.mapped.get(CsvField::ToAddress2).map(str::to_string)),
            city: Set(self.to_zone.city),
            state: Set(self.to_zone.state),
            zip: Set(field_string(&self.mapped, CsvField::ToAddressZip)),
            zone: Set(Some(self.to_zone.zone)),
            from_package_id: Set(None),
            to_package_id: Set(None),
            ..Default::default()
        };

        (pkg, ship_from, ship_to)
    }
}

fn field_string(mapped: &MappedRecord, field: CsvField) -> String {
    mapped.get(field).map(str::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use model::entities::postal_zone;
    use sea_orm::{ActiveModelTrait, Database};

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None).await.expect("Migrations failed");
        db
    }

    async fn seed_zone(db: &DatabaseConnection, zip: &str, city: &str, state: &str, zone: &str) {
        postal_zone::ActiveModel {
            zip_code: Set(zip.to_string()),
            city: Set(city.to_string()),
            state: Set(state.to_string()),
            zone: Set(zone.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed postal zone");
    }

    fn full_row() -> CsvRow {
        [
            ("Weight", "2.5"),
            ("Reference", "ORDER-1"),
            ("From Name", "Acme Warehouse"),
            ("From Zip", "90001"),
            ("From Address 1", "100 Dock St"),
            ("To Name", "Pat Receiver"),
            ("To Zip", "10001"),
            ("To Address 1", "1 Main St"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[tokio::test]
    async fn prepares_record_with_both_zones() {
        let db = setup_db().await;
        seed_zone(&db, "90001", "Los Angeles", "CA", "4").await;
        seed_zone(&db, "10001", "New York", "NY", "8").await;

        let mapping = HeaderMapping::builtin();
        let prepared = prepare_record(&db, &full_row(), &mapping)
            .await
            .unwrap()
            .expect("row should be accepted");
        assert_eq!(prepared.from_zone.state, "CA");
        assert_eq!(prepared.to_zone.zone, "8");

        let (pkg, from, to) = prepared.into_models(7);
        assert_eq!(pkg.weight.as_ref(), &2.5);
        assert_eq!(pkg.length.as_ref(), &0.0);
        assert_eq!(from.city.as_ref(), "Los Angeles");
        assert_eq!(to.name.as_ref(), "Pat Receiver");
        // Link fields stay null until the coordinator stamps them
        assert_eq!(from.from_package_id.as_ref(), &None);
        assert_eq!(to.to_package_id.as_ref(), &None);
    }

    #[tokio::test]
    async fn unknown_from_zip_skips_the_row() {
        let db = setup_db().await;
        // Only the destination zone exists
        seed_zone(&db, "10001", "New York", "NY", "8").await;

        let mapping = HeaderMapping::builtin();
        let prepared = prepare_record(&db, &full_row(), &mapping).await.unwrap();
        assert!(prepared.is_none());
    }

    #[tokio::test]
    async fn unknown_to_zip_skips_the_row() {
        let db = setup_db().await;
        seed_zone(&db, "90001", "Los Angeles", "CA", "4").await;

        let mapping = HeaderMapping::builtin();
        let prepared = prepare_record(&db, &full_row(), &mapping).await.unwrap();
        assert!(prepared.is_none());
    }

    #[tokio::test]
    async fn missing_required_field_skips_the_row() {
        let db = setup_db().await;
        seed_zone(&db, "90001", "Los Angeles", "CA", "4").await;
        seed_zone(&db, "10001", "New York", "NY", "8").await;

        let mut row = full_row();
        row.remove("Weight");
        let mapping = HeaderMapping::builtin();
        let prepared = prepare_record(&db, &row, &mapping).await.unwrap();
        assert!(prepared.is_none());
    }

    #[tokio::test]
    async fn non_numeric_weight_skips_the_row() {
        let db = setup_db().await;
        seed_zone(&db, "90001", "Los Angeles", "CA", "4").await;
        seed_zone(&db, "10001", "New York", "NY", "8").await;

        let mut row = full_row();
        row.insert("Weight".to_string(), "heavy".to_string());
        let mapping = HeaderMapping::builtin();
        let prepared = prepare_record(&db, &row, &mapping).await.unwrap();
        assert!(prepared.is_none());
    }

    #[tokio::test]
    async fn supplied_tracking_number_is_kept() {
        let db = setup_db().await;
        seed_zone(&db, "90001", "Los Angeles", "CA", "4").await;
        seed_zone(&db, "10001", "New York", "NY", "8").await;

        let mut row = full_row();
        row.insert("Tracking Number".to_string(), "MK55555555US".to_string());
        let mapping = HeaderMapping::builtin();
        let prepared = prepare_record(&db, &row, &mapping)
            .await
            .unwrap()
            .expect("row should be accepted");
        let (pkg, _, _) = prepared.into_models(7);
        assert_eq!(pkg.tracking_no.as_ref(), "MK55555555US");
    }
}
