use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use batch::mapping::resolve_header_mapping;
use batch::normalize::prepare_record;
use batch::persist::{BatchData, process_batch};
use batch::reader::read_rows;
use batch::{ImportError, error::reduced_error};
use model::entities::user;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::schemas::{AppState, ErrorResponse};

/// Query parameters for the CSV import endpoint. The mapping is a JSON
/// object from canonical field names to CSV header names; malformed or
/// absent mappings fall back to the built-in headers.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportQuery {
    pub user_id: i32,
    pub header_mapping: Option<String>,
}

/// Outcome of a CSV import: rows inserted and rows skipped
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct ImportResponse {
    pub success: bool,
    pub inserted: usize,
    pub skipped: usize,
}

/// Import packages in bulk from a CSV document
#[utoipa::path(
    post,
    path = "/api/v1/packages/import",
    tag = "packages",
    request_body(content = String, content_type = "text/csv"),
    params(
        ("user_id" = i32, Query, description = "Owner for all imported packages"),
        ("header_mapping" = Option<String>, Query, description = "JSON object mapping canonical fields to CSV headers"),
    ),
    responses(
        (status = 200, description = "Import completed", body = ImportResponse),
        (status = 400, description = "CSV could not be parsed", body = ErrorResponse),
        (status = 404, description = "Owner not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn import_packages(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    body: String,
) -> Result<Json<ImportResponse>, (StatusCode, Json<ErrorResponse>)> {
    let owner = user::Entity::find_by_id(query.user_id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;
    if owner.is_none() {
        warn!("Owner {} not found for import", query.user_id);
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "User not found".to_string(),
                code: "USER_NOT_FOUND".to_string(),
                success: false,
            }),
        ));
    }

    let mapping = resolve_header_mapping(query.header_mapping.as_deref());

    let rows = match read_rows(&body) {
        Ok(rows) => rows,
        Err(parse_error) => {
            error!("{}", reduced_error("import_packages", &parse_error));
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("CSV parse failure: {parse_error}"),
                    code: "CSV_PARSE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let mut batch = BatchData::new();
    let mut skipped = 0usize;
    for row in &rows {
        match prepare_record(&state.db, row, &mapping).await {
            Ok(Some(prepared)) => {
                let (pkg, ship_from, ship_to) = prepared.into_models(query.user_id);
                batch.push(pkg, ship_from, ship_to);
            }
            Ok(None) => skipped += 1,
            Err(import_error) => {
                // Row normalization only fails on database errors
                error!("{}", reduced_error("import_packages", &import_error));
                return Err(import_failure(import_error));
            }
        }
    }

    let inserted = batch.len();
    if let Err(import_error) = process_batch(&state.db, batch).await {
        return Err(import_failure(import_error));
    }

    info!(
        "Imported {} packages for user {} ({} rows skipped)",
        inserted, query.user_id, skipped
    );
    Ok(Json(ImportResponse {
        success: true,
        inserted,
        skipped,
    }))
}

fn import_failure(import_error: ImportError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match import_error {
        ImportError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse {
            error: import_error.to_string(),
            code: import_error.name().to_uppercase(),
            success: false,
        }),
    )
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
