use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use batch::zones::{lookup_zone, zone_info};
use common::ZoneInfo;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};
use utoipa::ToSchema;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Query parameters for the zone-between-zips lookup
#[derive(Debug, Deserialize, ToSchema)]
pub struct GetZoneQuery {
    pub from_zip: String,
    pub to_zip: String,
}

/// Shipping zone between two zips. The zone is that of the destination.
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct GetZoneResponse {
    pub zone: String,
}

/// Cached lookup; misses fall through to the postal-zone table.
async fn cached_zone(state: &AppState, zip: &str) -> Result<Option<ZoneInfo>, sea_orm::DbErr> {
    if let Some(info) = state.zone_cache.get(zip).await {
        debug!("Zone cache hit for zip {}", zip);
        return Ok(Some(info));
    }
    let found = lookup_zone(&state.db, zip).await.map_err(|e| match e {
        batch::ImportError::Database(db_error) => db_error,
        other => sea_orm::DbErr::Custom(other.to_string()),
    })?;
    match found {
        Some(model) => {
            let info = zone_info(&model);
            state.zone_cache.insert(zip.to_string(), info.clone()).await;
            Ok(Some(info))
        }
        None => Ok(None),
    }
}

fn internal_error(db_error: sea_orm::DbErr) -> (StatusCode, Json<ErrorResponse>) {
    error!("Database error: {}", db_error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error".to_string(),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        }),
    )
}

fn zip_not_found(zip: &str) -> (StatusCode, Json<ErrorResponse>) {
    warn!("No zone info for zip {}", zip);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("No zone info for zip: {zip}"),
            code: "ZIP_NOT_FOUND".to_string(),
            success: false,
        }),
    )
}

/// Get the shipping zone between an origin and a destination zip
#[utoipa::path(
    get,
    path = "/api/v1/postal-zones/zone",
    tag = "postal-zones",
    params(
        ("from_zip" = String, Query, description = "Origin zip code"),
        ("to_zip" = String, Query, description = "Destination zip code"),
    ),
    responses(
        (status = 200, description = "Zone retrieved successfully", body = GetZoneResponse),
        (status = 404, description = "One of the zips is unknown", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_zone(
    State(state): State<AppState>,
    Query(query): Query<GetZoneQuery>,
) -> Result<Json<GetZoneResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Both ends must be known even though only the destination decides
    cached_zone(&state, &query.from_zip)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| zip_not_found(&query.from_zip))?;
    let destination = cached_zone(&state, &query.to_zip)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| zip_not_found(&query.to_zip))?;

    Ok(Json(GetZoneResponse {
        zone: destination.zone,
    }))
}

/// Get city, state and zone for one zip
#[utoipa::path(
    get,
    path = "/api/v1/postal-zones/{zip}",
    tag = "postal-zones",
    params(
        ("zip" = String, Path, description = "Zip code to look up"),
    ),
    responses(
        (status = 200, description = "Postal zone retrieved successfully", body = ApiResponse<ZoneInfo>),
        (status = 404, description = "Zip not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_postal_zone(
    Path(zip): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ZoneInfo>>, (StatusCode, Json<ErrorResponse>)> {
    match cached_zone(&state, &zip).await.map_err(internal_error)? {
        Some(info) => Ok(Json(ApiResponse {
            data: info,
            message: "Postal zone retrieved successfully".to_string(),
            success: true,
        })),
        None => Err(zip_not_found(&zip)),
    }
}
