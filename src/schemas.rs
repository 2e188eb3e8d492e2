use common::ZoneInfo;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for postal-zone lookups (zip code -> zone info)
    pub zone_cache: Cache<String, ZoneInfo>,
}

/// API response wrapper
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::packages::create_package,
        crate::handlers::packages::get_packages,
        crate::handlers::packages::get_package,
        crate::handlers::packages::update_package,
        crate::handlers::packages::delete_package,
        crate::handlers::import::import_packages,
        crate::handlers::transactions::get_transactions,
        crate::handlers::transactions::get_transaction,
        crate::handlers::postal_zones::get_postal_zone,
        crate::handlers::postal_zones::get_zone,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ApiResponse<ZoneInfo>,
            ZoneInfo,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::packages::AddressPayload,
            crate::handlers::packages::CreatePackageRequest,
            crate::handlers::packages::CreatePackageResponse,
            crate::handlers::packages::UpdatePackageRequest,
            crate::handlers::packages::AddressResponse,
            crate::handlers::packages::PackageResponse,
            crate::handlers::packages::GetPackagesResponse,
            crate::handlers::packages::GetPackageResponse,
            crate::handlers::packages::SimpleResponse,
            crate::handlers::import::ImportResponse,
            crate::handlers::transactions::TransactionResponse,
            crate::handlers::transactions::GetTransactionsResponse,
            crate::handlers::postal_zones::GetZoneResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management endpoints"),
        (name = "packages", description = "Package CRUD and CSV import endpoints"),
        (name = "transactions", description = "Billing history endpoints"),
        (name = "postal-zones", description = "Postal zone lookup endpoints"),
    ),
    info(
        title = "ShipRust API",
        description = "Shipping and package-management backend: package CRUD, CSV batch import, postal-zone lookup, and transaction history",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
