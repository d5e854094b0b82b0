use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    Error, UserID,
    transaction::{
        TransactionState, create_transaction,
        form::{TransactionForm, ValidatedTransaction},
    },
};

/// A route handler for creating a new transaction owned by the caller.
///
/// Responds with 201 Created and the ID of the new transaction.
///
/// # Errors
///
/// Responds with 400 Bad Request if the body is malformed or fails validation.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(form) = form?;
    let transaction = ValidatedTransaction::try_from(form)?;

    let id = state
        .db_pool
        .run(move |connection| create_transaction(user_id, &transaction, connection))
        .await?;

    tracing::debug!("User {user_id} created transaction {id}");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "transaction created successfully", "id": id })),
    ))
}
