use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use batch::tracking::generate_tracking_no;
use batch::zones::{lookup_zone, zone_info};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use common::ZoneInfo;
use model::entities::{address, package, transaction_record, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};
use utoipa::ToSchema;

use crate::handlers::transactions::TransactionResponse;
use crate::handlers::users::UserResponse;
use crate::schemas::{AppState, ErrorResponse};

/// Substring filters shorter than this are ignored.
const MIN_FILTER_LEN: usize = 2;
/// Regeneration attempts when a generated tracking number collides.
const MAX_TRACKING_ATTEMPTS: u32 = 3;

/// Address payload for the single create/update path. City, state and zone
/// are derived from the zip via postal-zone lookup, never accepted from
/// the caller.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AddressPayload {
    pub name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub zip: String,
}

/// Request body for creating a new package
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatePackageRequest {
    /// Owner user ID (stamped by the auth boundary)
    pub user_id: i32,
    /// Weight is required; dimensions default to zero
    pub weight: f64,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub reference_no: Option<String>,
    /// Tracking number; generated when absent
    pub tracking_no: Option<String>,
    pub from_address: AddressPayload,
    pub to_address: AddressPayload,
}

/// Response for a successful create
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageResponse {
    pub success: bool,
    pub package_id: i32,
}

/// Request body for updating a package. Absent fields are left unchanged;
/// address payloads update the linked address of the matching side.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdatePackageRequest {
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub reference_no: Option<String>,
    pub tracking_no: Option<String>,
    pub from_address: Option<AddressPayload>,
    pub to_address: Option<AddressPayload>,
}

/// Address response model
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct AddressResponse {
    pub id: i32,
    pub address_type: String,
    pub name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub zone: Option<String>,
    pub from_package_id: Option<i32>,
    pub to_package_id: Option<i32>,
}

impl From<address::Model> for AddressResponse {
    fn from(model: address::Model) -> Self {
        let address_type = match model.address_type {
            address::AddressType::FromPackage => "from_package",
            address::AddressType::ToPackage => "to_package",
        };
        Self {
            id: model.id,
            address_type: address_type.to_string(),
            name: model.name,
            address1: model.address1,
            address2: model.address2,
            city: model.city,
            state: model.state,
            zip: model.zip,
            zone: model.zone,
            from_package_id: model.from_package_id,
            to_package_id: model.to_package_id,
        }
    }
}

/// Package response model with its related records attached
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct PackageResponse {
    pub id: i32,
    pub user_id: i32,
    pub tracking_no: String,
    pub reference_no: Option<String>,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub from_address: Option<AddressResponse>,
    pub to_address: Option<AddressResponse>,
    pub owner: Option<UserResponse>,
    pub latest_transaction: Option<TransactionResponse>,
}

/// Response for the list endpoint: a filtered page plus the unpaginated
/// total under the same filters.
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct GetPackagesResponse {
    pub total: u64,
    pub packages: Vec<PackageResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct GetPackageResponse {
    pub package: PackageResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct SimpleResponse {
    pub message: String,
}

/// Query parameters for the list endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListPackagesQuery {
    /// Owner scope; only this user's packages are visible
    pub user_id: i32,
    /// Tracking-number substring (ignored when shorter than 2 chars)
    pub tracking: Option<String>,
    /// Address-line substring matched against both the from and to address
    pub address: Option<String>,
    /// Creation-date range, applied only when both bounds are valid dates
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: String, code: &str) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
            success: false,
        }),
    )
}

fn internal_error(db_error: DbErr) -> HandlerError {
    error!("Database error: {}", db_error);
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
        "DATABASE_ERROR",
    )
}

fn package_not_found(id: i32) -> HandlerError {
    warn!("Package with ID {} not found", id);
    api_error(
        StatusCode::NOT_FOUND,
        "Package not found".to_string(),
        "PACKAGE_NOT_FOUND",
    )
}

/// Resolve a zip through the zone cache, falling back to the postal-zone
/// table. A miss on the manual path is a validation failure.
async fn resolve_zone(state: &AppState, zip: &str) -> Result<ZoneInfo, HandlerError> {
    if let Some(info) = state.zone_cache.get(zip).await {
        return Ok(info);
    }
    let found = lookup_zone(&state.db, zip)
        .await
        .map_err(|e| match e {
            batch::ImportError::Database(db_error) => internal_error(db_error),
            other => api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                other.to_string(),
                "LOOKUP_ERROR",
            ),
        })?;
    match found {
        Some(model) => {
            let info = zone_info(&model);
            state.zone_cache.insert(zip.to_string(), info.clone()).await;
            Ok(info)
        }
        None => Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("No zone info for zip: {zip}"),
            "UNKNOWN_ZIP",
        )),
    }
}

fn build_address(
    user_id: i32,
    package_id: i32,
    address_type: address::AddressType,
    payload: &AddressPayload,
    zone: &ZoneInfo,
) -> address::ActiveModel {
    let (from_link, to_link) = match address_type {
        address::AddressType::FromPackage => (Some(package_id), None),
        address::AddressType::ToPackage => (None, Some(package_id)),
    };
    address::ActiveModel {
        user_id: Set(user_id),
        address_type: Set(address_type),
        name: Set(payload.name.clone()),
        address1: Set(payload.address1.clone()),
        address2: Set(payload.address2.clone()),
        city: Set(zone.city.clone()),
        state: Set(zone.state.clone()),
        zip: Set(payload.zip.clone()),
        zone: Set(Some(zone.zone.clone())),
        from_package_id: Set(from_link),
        to_package_id: Set(to_link),
        ..Default::default()
    }
}

/// Insert the package and both addresses in one transaction; the addresses
/// carry the fresh package id before anything is visible outside.
async fn insert_package_with_addresses(
    db: &DatabaseConnection,
    request: &CreatePackageRequest,
    tracking_no: String,
    from_zone: &ZoneInfo,
    to_zone: &ZoneInfo,
) -> Result<i32, DbErr> {
    let txn = db.begin().await?;

    let pkg = package::ActiveModel {
        user_id: Set(request.user_id),
        tracking_no: Set(tracking_no),
        reference_no: Set(request.reference_no.clone()),
        length: Set(request.length.unwrap_or(0.0)),
        width: Set(request.width.unwrap_or(0.0)),
        height: Set(request.height.unwrap_or(0.0)),
        weight: Set(request.weight),
        source: Set(package::PackageSource::Manual),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    build_address(
        request.user_id,
        pkg.id,
        address::AddressType::FromPackage,
        &request.from_address,
        from_zone,
    )
    .insert(&txn)
    .await?;

    build_address(
        request.user_id,
        pkg.id,
        address::AddressType::ToPackage,
        &request.to_address,
        to_zone,
    )
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(pkg.id)
}

/// Create a new package together with its from/to address pair
#[utoipa::path(
    post,
    path = "/api/v1/packages",
    tag = "packages",
    request_body = CreatePackageRequest,
    responses(
        (status = 201, description = "Package created successfully", body = CreatePackageResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 404, description = "Owner not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_package(
    State(state): State<AppState>,
    Json(request): Json<CreatePackageRequest>,
) -> Result<(StatusCode, Json<CreatePackageResponse>), HandlerError> {
    let owner = user::Entity::find_by_id(request.user_id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;
    if owner.is_none() {
        warn!("Owner {} not found for create_package", request.user_id);
        return Err(api_error(
            StatusCode::NOT_FOUND,
            "User not found".to_string(),
            "USER_NOT_FOUND",
        ));
    }

    // Resolve both sides before writing anything
    let from_zone = resolve_zone(&state, &request.from_address.zip).await?;
    let to_zone = resolve_zone(&state, &request.to_address.zip).await?;

    match insert_with_tracking_retry(
        &state.db,
        &request,
        &from_zone,
        &to_zone,
        generate_tracking_no,
    )
    .await
    {
        Ok(package_id) => {
            debug!("Package created with ID: {}", package_id);
            Ok((
                StatusCode::CREATED,
                Json(CreatePackageResponse {
                    success: true,
                    package_id,
                }),
            ))
        }
        Err(db_error) => {
            error!("Error in create_package: {}", db_error);
            Err(match db_error.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) => api_error(
                    StatusCode::BAD_REQUEST,
                    format!("Duplicate tracking number: {msg}"),
                    "DUPLICATE_TRACKING_NO",
                ),
                Some(SqlErr::ForeignKeyConstraintViolation(msg)) => api_error(
                    StatusCode::BAD_REQUEST,
                    format!("Constraint violation: {msg}"),
                    "CONSTRAINT_VIOLATION",
                ),
                _ => internal_error(db_error),
            })
        }
    }
}

/// Insert with the retry policy for tracking numbers: a caller-supplied
/// number gets exactly one attempt, an auto-generated one is regenerated
/// on a unique-constraint collision, up to `MAX_TRACKING_ATTEMPTS` total.
/// Any other failure, or exhaustion, surfaces the last database error.
pub(crate) async fn insert_with_tracking_retry<F>(
    db: &DatabaseConnection,
    request: &CreatePackageRequest,
    from_zone: &ZoneInfo,
    to_zone: &ZoneInfo,
    mut generate: F,
) -> Result<i32, DbErr>
where
    F: FnMut() -> String,
{
    let supplied_tracking = request.tracking_no.clone();
    let mut attempts_left = if supplied_tracking.is_some() {
        1
    } else {
        MAX_TRACKING_ATTEMPTS
    };

    loop {
        attempts_left -= 1;
        let tracking_no = supplied_tracking.clone().unwrap_or_else(&mut generate);

        match insert_package_with_addresses(db, request, tracking_no, from_zone, to_zone).await {
            Ok(package_id) => return Ok(package_id),
            Err(db_error) => {
                let is_unique = matches!(
                    db_error.sql_err(),
                    Some(SqlErr::UniqueConstraintViolation(_))
                );
                if is_unique && supplied_tracking.is_none() && attempts_left > 0 {
                    warn!("Generated tracking number collided, regenerating");
                    continue;
                }
                return Err(db_error);
            }
        }
    }
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

/// The filter set shared by the page query and the total count.
async fn build_filter(
    db: &DatabaseConnection,
    query: &ListPackagesQuery,
) -> Result<Condition, DbErr> {
    let mut cond = Condition::all().add(package::Column::UserId.eq(query.user_id));

    if let Some(tracking) = query.tracking.as_deref() {
        if tracking.len() >= MIN_FILTER_LEN {
            cond = cond.add(package::Column::TrackingNo.contains(tracking));
        }
    }

    // Only applied when both bounds parse as calendar dates
    if let (Some(start), Some(end)) = (
        parse_date(query.start_date.as_deref()),
        parse_date(query.end_date.as_deref()),
    ) {
        let start_at =
            DateTime::<Utc>::from_naive_utc_and_offset(start.and_time(NaiveTime::MIN), Utc);
        let end_excl = end.succ_opt().unwrap_or(end);
        let end_at =
            DateTime::<Utc>::from_naive_utc_and_offset(end_excl.and_time(NaiveTime::MIN), Utc);
        cond = cond
            .add(package::Column::CreatedAt.gte(start_at))
            .add(package::Column::CreatedAt.lt(end_at));
    }

    if let Some(needle) = query.address.as_deref() {
        if needle.len() >= MIN_FILTER_LEN {
            // Both the from and the to address must match the substring,
            // mirroring the inner-join semantics of the list filter.
            let matches = address::Entity::find()
                .filter(
                    Condition::any()
                        .add(address::Column::Address1.contains(needle))
                        .add(address::Column::Address2.contains(needle)),
                )
                .all(db)
                .await?;
            let from_ids: HashSet<i32> = matches
                .iter()
                .filter(|m| m.address_type == address::AddressType::FromPackage)
                .filter_map(|m| m.from_package_id)
                .collect();
            let to_ids: HashSet<i32> = matches
                .iter()
                .filter(|m| m.address_type == address::AddressType::ToPackage)
                .filter_map(|m| m.to_package_id)
                .collect();
            cond = cond
                .add(package::Column::Id.is_in(from_ids))
                .add(package::Column::Id.is_in(to_ids));
        }
    }

    Ok(cond)
}

/// Attach from/to addresses, owners, and the latest transaction to a page
/// of packages with one batched query per relation.
async fn attach_related(
    db: &DatabaseConnection,
    packages: Vec<package::Model>,
) -> Result<Vec<PackageResponse>, DbErr> {
    let pkg_ids: Vec<i32> = packages.iter().map(|p| p.id).collect();
    let user_ids: HashSet<i32> = packages.iter().map(|p| p.user_id).collect();

    let mut from_addresses: HashMap<i32, address::Model> = address::Entity::find()
        .filter(address::Column::FromPackageId.is_in(pkg_ids.clone()))
        .filter(address::Column::AddressType.eq(address::AddressType::FromPackage))
        .all(db)
        .await?
        .into_iter()
        .filter_map(|a| a.from_package_id.map(|id| (id, a)))
        .collect();

    let mut to_addresses: HashMap<i32, address::Model> = address::Entity::find()
        .filter(address::Column::ToPackageId.is_in(pkg_ids.clone()))
        .filter(address::Column::AddressType.eq(address::AddressType::ToPackage))
        .all(db)
        .await?
        .into_iter()
        .filter_map(|a| a.to_package_id.map(|id| (id, a)))
        .collect();

    let owners: HashMap<i32, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    // Newest first, so the first row seen per package is its latest event
    let mut latest: HashMap<i32, transaction_record::Model> = HashMap::new();
    let history = transaction_record::Entity::find()
        .filter(transaction_record::Column::PackageId.is_in(pkg_ids))
        .order_by_desc(transaction_record::Column::DateAdded)
        .all(db)
        .await?;
    for tx in history {
        latest.entry(tx.package_id).or_insert(tx);
    }

    Ok(packages
        .into_iter()
        .map(|pkg| {
            let owner = owners.get(&pkg.user_id).cloned().map(UserResponse::from);
            PackageResponse {
                from_address: from_addresses.remove(&pkg.id).map(AddressResponse::from),
                to_address: to_addresses.remove(&pkg.id).map(AddressResponse::from),
                owner,
                latest_transaction: latest.remove(&pkg.id).map(TransactionResponse::from),
                id: pkg.id,
                user_id: pkg.user_id,
                tracking_no: pkg.tracking_no,
                reference_no: pkg.reference_no,
                length: pkg.length,
                width: pkg.width,
                height: pkg.height,
                weight: pkg.weight,
                source: pkg.source.as_str().to_string(),
                created_at: pkg.created_at,
            }
        })
        .collect())
}

/// List packages for an owner with optional filters and pagination
#[utoipa::path(
    get,
    path = "/api/v1/packages",
    tag = "packages",
    params(
        ("user_id" = i32, Query, description = "Owner user ID"),
        ("tracking" = Option<String>, Query, description = "Tracking-number substring filter"),
        ("address" = Option<String>, Query, description = "Address-line substring filter"),
        ("start_date" = Option<String>, Query, description = "Creation date lower bound (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "Creation date upper bound (YYYY-MM-DD)"),
        ("limit" = Option<u64>, Query, description = "Page size (default 100)"),
        ("offset" = Option<u64>, Query, description = "Page offset (default 0)"),
    ),
    responses(
        (status = 200, description = "Packages retrieved successfully", body = GetPackagesResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_packages(
    State(state): State<AppState>,
    Query(query): Query<ListPackagesQuery>,
) -> Result<Json<GetPackagesResponse>, HandlerError> {
    let limit = query.limit.unwrap_or(100);
    let offset = query.offset.unwrap_or(0);

    let cond = build_filter(&state.db, &query)
        .await
        .map_err(internal_error)?;

    // Total is computed with the same filters, ignoring pagination
    let total = package::Entity::find()
        .filter(cond.clone())
        .count(&state.db)
        .await
        .map_err(internal_error)?;

    let page = package::Entity::find()
        .filter(cond)
        .order_by_asc(package::Column::Id)
        .limit(limit)
        .offset(offset)
        .all(&state.db)
        .await
        .map_err(internal_error)?;

    let packages = attach_related(&state.db, page)
        .await
        .map_err(internal_error)?;

    Ok(Json(GetPackagesResponse { total, packages }))
}

/// Get a specific package by ID
#[utoipa::path(
    get,
    path = "/api/v1/packages/{package_id}",
    tag = "packages",
    params(
        ("package_id" = i32, Path, description = "Package ID"),
    ),
    responses(
        (status = 200, description = "Package retrieved successfully", body = GetPackageResponse),
        (status = 404, description = "Package not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_package(
    Path(package_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<GetPackageResponse>, HandlerError> {
    let pkg = package::Entity::find_by_id(package_id)
        .one(&state.db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| package_not_found(package_id))?;

    let mut attached = attach_related(&state.db, vec![pkg])
        .await
        .map_err(internal_error)?;
    let package = attached
        .pop()
        .ok_or_else(|| package_not_found(package_id))?;

    Ok(Json(GetPackageResponse { package }))
}

/// Update the linked address of one side, re-deriving zone info when the
/// zip changes.
async fn update_address_with_info(
    state: &AppState,
    package_id: i32,
    address_type: address::AddressType,
    payload: AddressPayload,
) -> Result<(), HandlerError> {
    let link_column = match address_type {
        address::AddressType::FromPackage => address::Column::FromPackageId,
        address::AddressType::ToPackage => address::Column::ToPackageId,
    };
    let existing = address::Entity::find()
        .filter(link_column.eq(package_id))
        .filter(address::Column::AddressType.eq(address_type))
        .one(&state.db)
        .await
        .map_err(internal_error)?;
    let Some(existing) = existing else {
        warn!(
            "Package {} has no {:?} address to update",
            package_id, address_type
        );
        return Ok(());
    };

    let zone = resolve_zone(state, &payload.zip).await?;

    let mut active: address::ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.address1 = Set(payload.address1);
    active.address2 = Set(payload.address2);
    active.zip = Set(payload.zip);
    active.city = Set(zone.city);
    active.state = Set(zone.state);
    active.zone = Set(Some(zone.zone));
    active.update(&state.db).await.map_err(internal_error)?;
    Ok(())
}

/// Update a package and its linked addresses
#[utoipa::path(
    put,
    path = "/api/v1/packages/{package_id}",
    tag = "packages",
    params(
        ("package_id" = i32, Path, description = "Package ID"),
    ),
    request_body = UpdatePackageRequest,
    responses(
        (status = 200, description = "Package updated successfully", body = GetPackageResponse),
        (status = 404, description = "Package not found", body = ErrorResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_package(
    Path(package_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdatePackageRequest>,
) -> Result<Json<GetPackageResponse>, HandlerError> {
    let pkg = package::Entity::find_by_id(package_id)
        .one(&state.db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| package_not_found(package_id))?;

    // Addresses first, each via its own update path
    if let Some(payload) = request.from_address {
        update_address_with_info(&state, pkg.id, address::AddressType::FromPackage, payload)
            .await?;
    }
    if let Some(payload) = request.to_address {
        update_address_with_info(&state, pkg.id, address::AddressType::ToPackage, payload).await?;
    }

    // Then merge the remaining scalar fields onto the package
    let mut active: package::ActiveModel = pkg.into();
    if let Some(weight) = request.weight {
        active.weight = Set(weight);
    }
    if let Some(length) = request.length {
        active.length = Set(length);
    }
    if let Some(width) = request.width {
        active.width = Set(width);
    }
    if let Some(height) = request.height {
        active.height = Set(height);
    }
    if let Some(reference_no) = request.reference_no {
        active.reference_no = Set(Some(reference_no));
    }
    if let Some(tracking_no) = request.tracking_no {
        active.tracking_no = Set(tracking_no);
    }

    let updated = match active.update(&state.db).await {
        Ok(updated) => updated,
        Err(db_error) => {
            error!("Failed to update package {}: {}", package_id, db_error);
            return Err(match db_error.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) => api_error(
                    StatusCode::BAD_REQUEST,
                    format!("Duplicate tracking number: {msg}"),
                    "DUPLICATE_TRACKING_NO",
                ),
                _ => internal_error(db_error),
            });
        }
    };

    let mut attached = attach_related(&state.db, vec![updated])
        .await
        .map_err(internal_error)?;
    let package = attached
        .pop()
        .ok_or_else(|| package_not_found(package_id))?;
    Ok(Json(GetPackageResponse { package }))
}

/// Delete a package and both of its linked addresses
#[utoipa::path(
    delete,
    path = "/api/v1/packages/{package_id}",
    tag = "packages",
    params(
        ("package_id" = i32, Path, description = "Package ID"),
    ),
    responses(
        (status = 200, description = "Package deleted successfully", body = SimpleResponse),
        (status = 404, description = "Package not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_package(
    Path(package_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<SimpleResponse>, HandlerError> {
    let pkg = package::Entity::find_by_id(package_id)
        .one(&state.db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| package_not_found(package_id))?;

    // Addresses go first; deleting the package before them would break the
    // foreign-key relationship.
    address::Entity::delete_many()
        .filter(address::Column::FromPackageId.eq(pkg.id))
        .filter(address::Column::AddressType.eq(address::AddressType::FromPackage))
        .exec(&state.db)
        .await
        .map_err(internal_error)?;
    address::Entity::delete_many()
        .filter(address::Column::ToPackageId.eq(pkg.id))
        .filter(address::Column::AddressType.eq(address::AddressType::ToPackage))
        .exec(&state.db)
        .await
        .map_err(internal_error)?;
    package::Entity::delete_by_id(pkg.id)
        .exec(&state.db)
        .await
        .map_err(internal_error)?;

    Ok(Json(SimpleResponse {
        message: "Package deleted".to_string(),
    }))
}
