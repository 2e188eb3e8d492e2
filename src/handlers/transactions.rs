use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use model::entities::{package, transaction_record};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument, warn};
use utoipa::ToSchema;

use crate::schemas::{AppState, ErrorResponse};

/// Transaction response model
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct TransactionResponse {
    pub id: i32,
    pub package_id: i32,
    pub event: String,
    pub cost: Decimal,
    pub date_added: DateTime<Utc>,
}

impl From<transaction_record::Model> for TransactionResponse {
    fn from(model: transaction_record::Model) -> Self {
        Self {
            id: model.id,
            package_id: model.package_id,
            event: model.event,
            cost: model.cost,
            date_added: model.date_added,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct GetTransactionsResponse {
    pub total: u64,
    pub transactions: Vec<TransactionResponse>,
}

/// Query parameters for the transaction list
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListTransactionsQuery {
    /// Restrict to packages owned by this user
    pub user_id: Option<i32>,
    /// Restrict to a single package
    pub package_id: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// List transactions, newest first
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "transactions",
    params(
        ("user_id" = Option<i32>, Query, description = "Filter by package owner"),
        ("package_id" = Option<i32>, Query, description = "Filter by package"),
        ("limit" = Option<u64>, Query, description = "Page size (default 100)"),
        ("offset" = Option<u64>, Query, description = "Page offset (default 0)"),
    ),
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = GetTransactionsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<GetTransactionsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let limit = query.limit.unwrap_or(100);
    let offset = query.offset.unwrap_or(0);

    let mut cond = Condition::all();
    if let Some(package_id) = query.package_id {
        cond = cond.add(transaction_record::Column::PackageId.eq(package_id));
    }
    if let Some(user_id) = query.user_id {
        // Owner scoping goes through the packages table
        let owned: Vec<i32> = package::Entity::find()
            .filter(package::Column::UserId.eq(user_id))
            .all(&state.db)
            .await
            .map_err(internal_error)?
            .into_iter()
            .map(|p| p.id)
            .collect();
        cond = cond.add(transaction_record::Column::PackageId.is_in(owned));
    }

    let total = transaction_record::Entity::find()
        .filter(cond.clone())
        .count(&state.db)
        .await
        .map_err(internal_error)?;

    let transactions = transaction_record::Entity::find()
        .filter(cond)
        .order_by_desc(transaction_record::Column::DateAdded)
        .limit(limit)
        .offset(offset)
        .all(&state.db)
        .await
        .map_err(internal_error)?
        .into_iter()
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(GetTransactionsResponse {
        total,
        transactions,
    }))
}

/// Get a specific transaction by ID
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction retrieved successfully", body = TransactionResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<TransactionResponse>, (StatusCode, Json<ErrorResponse>)> {
    match transaction_record::Entity::find_by_id(transaction_id)
        .one(&state.db)
        .await
        .map_err(internal_error)?
    {
        Some(model) => Ok(Json(TransactionResponse::from(model))),
        None => {
            warn!("Transaction with ID {} not found", transaction_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Transaction not found".to_string(),
                    code: "TRANSACTION_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
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
