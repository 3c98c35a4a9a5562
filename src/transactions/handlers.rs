use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    response::{ApiError, ApiResponse},
    state::AppState,
    transactions::{
        dto::{
            CheckoutResponse, CreateTransactionRequest, StatisticsResponse, TransactionDetail,
            TransactionLineItem, TransactionSummary,
        },
        repo,
        repo::CheckoutError,
        stats,
    },
};

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction).get(list_transactions))
        .route("/transactions/statistics", get(transaction_statistics))
        .route("/transactions/:id", get(get_transaction))
}

impl From<CheckoutError> for ApiError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::UserNotFound => ApiError::NotFound(e.to_string()),
            CheckoutError::BookNotFound(_) => ApiError::NotFound(e.to_string()),
            CheckoutError::InvalidQuantity | CheckoutError::InsufficientStock(_) => {
                ApiError::Validation(e.to_string())
            }
            CheckoutError::Db(e) => ApiError::Internal(e.into()),
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CheckoutResponse>>), ApiError> {
    let (Some(user_id), Some(items)) = (payload.user_id, payload.items) else {
        return Err(ApiError::Validation(
            "User ID and items array are required".into(),
        ));
    };
    if items.is_empty() {
        return Err(ApiError::Validation(
            "User ID and items array are required".into(),
        ));
    }

    let outcome = repo::create_order(&state.db, user_id, &items).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Transaction created successfully",
            CheckoutResponse {
                transaction_id: outcome.order_id,
                total_quantity: outcome.total_quantity,
                total_price: outcome.total_price,
            },
        )),
    ))
}

#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> Result<Json<ApiResponse<Vec<TransactionSummary>>>, ApiError> {
    let orders = repo::list_orders(&state.db).await?;
    let items = orders
        .into_iter()
        .map(|o| TransactionSummary {
            id: o.id,
            total_quantity: o.total_quantity,
            total_price: o.total_price,
        })
        .collect();

    Ok(Json(ApiResponse::new(
        "Get all transaction successfully",
        items,
    )))
}

#[instrument(skip(state))]
pub async fn get_transaction(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransactionDetail>>, ApiError> {
    let lines = repo::find_order_lines(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))?;

    let items: Vec<TransactionLineItem> = lines
        .into_iter()
        .map(|l| TransactionLineItem {
            book_id: l.book_id,
            book_title: l.book_title,
            quantity: l.quantity,
            subtotal_price: l.subtotal_price,
        })
        .collect();
    let total_quantity = items.iter().map(|i| i64::from(i.quantity)).sum();
    let total_price = items.iter().map(|i| i.subtotal_price).sum();

    Ok(Json(ApiResponse::new(
        "Get transaction detail successfully",
        TransactionDetail {
            id,
            items,
            total_quantity,
            total_price,
        },
    )))
}

#[instrument(skip(state))]
pub async fn transaction_statistics(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> Result<Json<ApiResponse<StatisticsResponse>>, ApiError> {
    let amounts = repo::order_amounts(&state.db).await?;
    let genre_sales = repo::genre_unit_sales(&state.db).await?;

    let extremes = stats::sales_extremes(&genre_sales);
    let (most, fewest) = match extremes {
        Some((most, fewest)) => (most.name.clone(), fewest.name.clone()),
        None => ("No data".to_string(), "No data".to_string()),
    };

    Ok(Json(ApiResponse::new(
        "Get transactions statistics successfully",
        StatisticsResponse {
            total_transactions: amounts.len() as i64,
            average_transaction_amount: stats::average_amount(&amounts),
            most_book_sales_genre: most,
            fewest_book_sales_genre: fewest,
        },
    )))
}
