use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::IntoResponse,
};

use crate::{
    Error, UserID,
    database_id::TransactionId,
    transaction::{
        TransactionState,
        filter::{TransactionFilter, TransactionQueryParams, query_transactions},
        get_transaction,
    },
};

/// A route handler for listing the caller's transactions.
///
/// The optional query parameters `type`, `start_date`, `end_date`, `sortBy`
/// and `order` filter and sort the list. Unknown `type`, `sortBy` and
/// `order` values are ignored.
///
/// # Errors
///
/// Responds with 400 Bad Request if the date range is invalid.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    query: Result<Query<TransactionQueryParams>, QueryRejection>,
) -> Result<impl IntoResponse, Error> {
    let Query(params) = query?;
    let filter = TransactionFilter::try_from(&params)?;

    let transactions = state
        .db_pool
        .run(move |connection| query_transactions(user_id, &filter, connection))
        .await?;

    Ok(Json(transactions))
}

/// A route handler for getting one of the caller's transactions.
///
/// # Errors
///
/// Responds with 404 Not Found if the transaction does not exist or belongs
/// to another user.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    path: Result<Path<TransactionId>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(transaction_id) = path?;

    let transaction = state
        .db_pool
        .run(move |connection| get_transaction(transaction_id, user_id, connection))
        .await?;

    Ok(Json(transaction))
}
