use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Name))
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 10))
                    .to_owned(),
            )
            .await?;

        // Create postal_zones table (reference data for zip lookups)
        manager
            .create_table(
                Table::create()
                    .table(PostalZones::Table)
                    .if_not_exists()
                    .col(pk_auto(PostalZones::Id))
                    .col(string(PostalZones::ZipCode).unique_key())
                    .col(string(PostalZones::City))
                    .col(string(PostalZones::State))
                    .col(string(PostalZones::Zone))
                    .to_owned(),
            )
            .await?;

        // Create packages table
        manager
            .create_table(
                Table::create()
                    .table(Packages::Table)
                    .if_not_exists()
                    .col(pk_auto(Packages::Id))
                    .col(integer(Packages::UserId))
                    .col(string(Packages::TrackingNo).unique_key())
                    .col(string_null(Packages::ReferenceNo))
                    .col(double(Packages::Length).default(0.0))
                    .col(double(Packages::Width).default(0.0))
                    .col(double(Packages::Height).default(0.0))
                    .col(double(Packages::Weight))
                    .col(string_len(Packages::Source, 10))
                    .col(timestamp_with_time_zone(Packages::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_owner")
                            .from(Packages::Table, Packages::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create addresses table. Exactly one of from_package_id /
        // to_package_id is set, matching the address_type tag.
        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(pk_auto(Addresses::Id))
                    .col(integer(Addresses::UserId))
                    .col(string_len(Addresses::AddressType, 15))
                    .col(string(Addresses::Name))
                    .col(string(Addresses::Address1))
                    .col(string_null(Addresses::Address2))
                    .col(string(Addresses::City))
                    .col(string(Addresses::State))
                    .col(string(Addresses::Zip))
                    .col(string_null(Addresses::Zone))
                    .col(integer_null(Addresses::FromPackageId))
                    .col(integer_null(Addresses::ToPackageId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_owner")
                            .from(Addresses::Table, Addresses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_from_package")
                            .from(Addresses::Table, Addresses::FromPackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_to_package")
                            .from(Addresses::Table, Addresses::ToPackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create transactions table (append-only history)
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(integer(Transactions::PackageId))
                    .col(string(Transactions::Event))
                    .col(decimal_len(Transactions::Cost, 16, 4))
                    .col(timestamp_with_time_zone(Transactions::DateAdded))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_package")
                            .from(Transactions::Table, Transactions::PackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Secondary indexes for the list filters and address-by-package lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_packages_user_id")
                    .table(Packages::Table)
                    .col(Packages::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_addresses_from_package_id")
                    .table(Addresses::Table)
                    .col(Addresses::FromPackageId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_addresses_to_package_id")
                    .table(Addresses::Table)
                    .col(Addresses::ToPackageId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Addresses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Packages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostalZones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
}

#[derive(DeriveIden)]
enum Packages {
    Table,
    Id,
    UserId,
    TrackingNo,
    ReferenceNo,
    Length,
    Width,
    Height,
    Weight,
    Source,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Addresses {
    Table,
    Id,
    UserId,
    AddressType,
    Name,
    Address1,
    Address2,
    City,
    State,
    Zip,
    Zone,
    FromPackageId,
    ToPackageId,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    PackageId,
    Event,
    Cost,
    DateAdded,
}

#[derive(DeriveIden)]
enum PostalZones {
    Table,
    Id,
    ZipCode,
    City,
    State,
    Zone,
}
