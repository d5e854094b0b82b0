use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    Error, UserID,
    database_id::TransactionId,
    transaction::{
        TransactionState,
        form::{TransactionForm, ValidatedTransaction},
        update_transaction,
    },
};

/// A route handler for replacing one of the caller's transactions.
///
/// The body must hold every field, as for creating a transaction.
///
/// # Errors
///
/// Responds with 400 Bad Request if the body fails validation, and with 404
/// Not Found if the transaction does not exist or belongs to another user.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    path: Result<Path<TransactionId>, PathRejection>,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(transaction_id) = path?;
    let Json(form) = form?;
    let transaction = ValidatedTransaction::try_from(form)?;

    state
        .db_pool
        .run(move |connection| {
            update_transaction(transaction_id, user_id, &transaction, connection)
        })
        .await?;

    tracing::debug!("User {user_id} updated transaction {transaction_id}");

    Ok(Json(json!({ "message": "transaction updated successfully" })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{create_test_transaction, get_test_server, register_test_user},
    };

    fn lunch() -> serde_json::Value {
        json!({
            "description": "Lunch",
            "amount": 25.5,
            "type": "expense",
            "date": "2024-01-10",
            "category": "Alimentação",
        })
    }

    #[tokio::test]
    async fn update_replaces_transaction() {
        let server = get_test_server();
        let (token, _) = register_test_user(&server, "Ana", "ana@example.com").await;
        let id = create_test_transaction(&server, &token, lunch()).await;
        let path = format_endpoint(endpoints::TRANSACTION, id);

        let response = server
            .put(&path)
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Dinner",
                "amount": "40",
                "type": "EXPENSE",
                "date": "2024-01-11",
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<serde_json::Value>()["message"],
            "transaction updated successfully"
        );
        let transaction = server
            .get(&path)
            .authorization_bearer(&token)
            .await
            .json::<serde_json::Value>();
        assert_eq!(transaction["description"], "Dinner");
        assert_eq!(transaction["amount"].as_f64(), Some(40.0));
        assert_eq!(transaction["type"], "expense");
        assert_eq!(transaction["date"], "2024-01-11");
        assert_eq!(transaction["category"], "Outros");
    }

    #[tokio::test]
    async fn update_rejects_invalid_body() {
        let server = get_test_server();
        let (token, _) = register_test_user(&server, "Ana", "ana@example.com").await;
        let id = create_test_transaction(&server, &token, lunch()).await;
        let mut body = lunch();
        body["amount"] = json!(-1);

        server
            .put(&format_endpoint(endpoints::TRANSACTION, id))
            .authorization_bearer(&token)
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_of_other_users_transaction_is_not_found() {
        let server = get_test_server();
        let (ana_token, _) = register_test_user(&server, "Ana", "ana@example.com").await;
        let (bruno_token, _) = register_test_user(&server, "Bruno", "bruno@example.com").await;
        let id = create_test_transaction(&server, &ana_token, lunch()).await;
        let path = format_endpoint(endpoints::TRANSACTION, id);

        server
            .put(&path)
            .authorization_bearer(&bruno_token)
            .json(&json!({
                "description": "Hacked",
                "amount": 1,
                "type": "income",
                "date": "2024-01-10",
            }))
            .await
            .assert_status_not_found();

        let transaction = server
            .get(&path)
            .authorization_bearer(&ana_token)
            .await
            .json::<serde_json::Value>();
        assert_eq!(transaction["description"], "Lunch");
    }
}
