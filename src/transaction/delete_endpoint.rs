use axum::{
    Extension, Json,
    extract::{Path, State, rejection::PathRejection},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    Error, UserID,
    database_id::TransactionId,
    transaction::{TransactionState, delete_transaction},
};

/// A route handler for deleting one of the caller's transactions.
///
/// # Errors
///
/// Responds with 404 Not Found if the transaction does not exist or belongs
/// to another user, so that the caller cannot learn which IDs are in use.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    path: Result<Path<TransactionId>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(transaction_id) = path?;

    state
        .db_pool
        .run(move |connection| delete_transaction(transaction_id, user_id, connection))
        .await?;

    tracing::debug!("User {user_id} deleted transaction {transaction_id}");

    Ok(Json(json!({ "message": "transaction deleted successfully" })))
}
