use model::entities::{address, package};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, Set, TransactionTrait,
};
use tracing::{error, info, instrument};

use crate::error::{ImportError, Result, reduced_error};

/// Three parallel sequences describing one batch: index `i` across all
/// three is one shipment. The address link fields are stamped with the
/// generated package ids before the addresses are inserted.
#[derive(Debug, Default)]
pub struct BatchData {
    pub pkg_batch: Vec<package::ActiveModel>,
    pub ship_from_batch: Vec<address::ActiveModel>,
    pub ship_to_batch: Vec<address::ActiveModel>,
}

impl BatchData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        pkg: package::ActiveModel,
        ship_from: address::ActiveModel,
        ship_to: address::ActiveModel,
    ) {
        self.pkg_batch.push(pkg);
        self.ship_from_batch.push(ship_from);
        self.ship_to_batch.push(ship_to);
    }

    pub fn len(&self) -> usize {
        self.pkg_batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pkg_batch.is_empty()
    }
}

/// Persist a prepared batch: insert the packages in input order, stamp the
/// generated ids into the matching from/to address records, then
/// bulk-insert both address sequences. The whole sequence runs in one
/// transaction, so a failure part-way cannot leave orphaned packages.
/// Returns the new package ids in input order.
#[instrument(skip(db, batch), fields(batch_len = batch.len()))]
pub async fn process_batch(db: &DatabaseConnection, batch: BatchData) -> Result<Vec<i32>> {
    if batch.ship_from_batch.len() != batch.pkg_batch.len()
        || batch.ship_to_batch.len() != batch.pkg_batch.len()
    {
        return Err(ImportError::Shape(format!(
            "{} packages but {} from-addresses and {} to-addresses",
            batch.pkg_batch.len(),
            batch.ship_from_batch.len(),
            batch.ship_to_batch.len()
        )));
    }
    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let txn = db.begin().await?;
    match insert_batch(&txn, batch).await {
        Ok(ids) => {
            txn.commit().await?;
            info!("batch import persisted {} packages", ids.len());
            Ok(ids)
        }
        Err(err) => {
            // Dropping the transaction rolls it back; nothing partial survives.
            error!("{}", reduced_error("process_batch", &err));
            Err(err)
        }
    }
}

async fn insert_batch(txn: &DatabaseTransaction, batch: BatchData) -> Result<Vec<i32>> {
    let BatchData {
        pkg_batch,
        mut ship_from_batch,
        mut ship_to_batch,
    } = batch;

    // Row-at-a-time keeps id recovery portable across backends; SQLite has
    // no usable RETURNING here. The surrounding transaction makes the whole
    // sequence atomic either way.
    let mut ids = Vec::with_capacity(pkg_batch.len());
    for pkg in pkg_batch {
        let inserted = pkg.insert(txn).await?;
        ids.push(inserted.id);
    }

    for (idx, id) in ids.iter().enumerate() {
        ship_from_batch[idx].from_package_id = Set(Some(*id));
        ship_to_batch[idx].to_package_id = Set(Some(*id));
    }

    address::Entity::insert_many(ship_from_batch).exec(txn).await?;
    address::Entity::insert_many(ship_to_batch).exec(txn).await?;

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use model::entities::prelude::{Address, Package};
    use model::entities::user;
    use sea_orm::{ActiveModelTrait, ColumnTrait, Database, QueryFilter};

    async fn setup_db() -> (DatabaseConnection, i32) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None).await.expect("Migrations failed");

        let owner = user::ActiveModel {
            name: Set("Batch Owner".to_string()),
            email: Set("batch@example.com".to_string()),
            password_hash: Set("hash".to_string()),
            role: Set(user::UserRole::Worker),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("Failed to create owner");

        (db, owner.id)
    }

    fn shipment(
        user_id: i32,
        tracking: &str,
    ) -> (
        package::ActiveModel,
        address::ActiveModel,
        address::ActiveModel,
    ) {
        let pkg = package::ActiveModel {
            user_id: Set(user_id),
            tracking_no: Set(tracking.to_string()),
            reference_no: Set(None),
            length: Set(0.0),
            width: Set(0.0),
            height: Set(0.0),
            weight: Set(1.0),
            source: Set(package::PackageSource::Batch),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let from = address::ActiveModel {
            user_id: Set(user_id),
            address_type: Set(address::AddressType::FromPackage),
            name: Set("Sender".to_string()),
            address1: Set("100 Dock St".to_string()),
            address2: Set(None),
            city: Set("Los Angeles".to_string()),
            state: Set("CA".to_string()),
            zip: Set("90001".to_string()),
            zone: Set(Some("4".to_string())),
            from_package_id: Set(None),
            to_package_id: Set(None),
            ..Default::default()
        };
        let to = address::ActiveModel {
            user_id: Set(user_id),
            address_type: Set(address::AddressType::ToPackage),
            name: Set("Receiver".to_string()),
            address1: Set("1 Main St".to_string()),
            address2: Set(None),
            city: Set("New York".to_string()),
            state: Set("NY".to_string()),
            zip: Set("10001".to_string()),
            zone: Set(Some("8".to_string())),
            from_package_id: Set(None),
            to_package_id: Set(None),
            ..Default::default()
        };
        (pkg, from, to)
    }

    #[tokio::test]
    async fn persists_n_packages_and_2n_linked_addresses() {
        let (db, user_id) = setup_db().await;

        let mut batch = BatchData::new();
        for i in 0..3 {
            let (pkg, from, to) = shipment(user_id, &format!("MK0000000{i}US"));
            batch.push(pkg, from, to);
        }

        let ids = process_batch(&db, batch).await.unwrap();
        assert_eq!(ids.len(), 3);

        let packages = Package::find().all(&db).await.unwrap();
        assert_eq!(packages.len(), 3);
        let addresses = Address::find().all(&db).await.unwrap();
        assert_eq!(addresses.len(), 6);

        // address[i]'s link field points at package[i] on both sides, and
        // the returned ids follow input order
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(packages[i].id, *id);
            assert_eq!(packages[i].tracking_no, format!("MK0000000{i}US"));

            let from = Address::find()
                .filter(address::Column::FromPackageId.eq(*id))
                .one(&db)
                .await
                .unwrap()
                .expect("from address missing");
            assert_eq!(from.address_type, address::AddressType::FromPackage);
            assert_eq!(from.to_package_id, None);

            let to = Address::find()
                .filter(address::Column::ToPackageId.eq(*id))
                .one(&db)
                .await
                .unwrap()
                .expect("to address missing");
            assert_eq!(to.address_type, address::AddressType::ToPackage);
            assert_eq!(to.from_package_id, None);
        }
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let (db, _) = setup_db().await;
        let ids = process_batch(&db, BatchData::new()).await.unwrap();
        assert!(ids.is_empty());
        assert!(Package::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mismatched_sequences_are_rejected() {
        let (db, user_id) = setup_db().await;

        let mut batch = BatchData::new();
        let (pkg, from, _) = shipment(user_id, "MK00000009US");
        batch.pkg_batch.push(pkg);
        batch.ship_from_batch.push(from);
        // no to-address

        let err = process_batch(&db, batch).await.unwrap_err();
        assert!(matches!(err, ImportError::Shape(_)));
        assert!(Package::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn constraint_failure_rolls_back_the_whole_batch() {
        let (db, user_id) = setup_db().await;

        // Two packages sharing a tracking number violate the unique key
        let mut batch = BatchData::new();
        let (pkg_a, from_a, to_a) = shipment(user_id, "MKDUPLICATEUS");
        let (pkg_b, from_b, to_b) = shipment(user_id, "MKDUPLICATEUS");
        batch.push(pkg_a, from_a, to_a);
        batch.push(pkg_b, from_b, to_b);

        let err = process_batch(&db, batch).await.unwrap_err();
        assert!(matches!(err, ImportError::Database(_)));

        // No partial success: neither packages nor addresses survive
        assert!(Package::find().all(&db).await.unwrap().is_empty());
        assert!(Address::find().all(&db).await.unwrap().is_empty());
    }
}
