//! Route handlers for the caller's totals and spending per category.

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    Error, UserID,
    transaction::{
        TransactionState,
        aggregation::{get_category_breakdown, get_summary},
        filter::DateRange,
    },
};

/// The query string accepted by the category breakdown.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQueryParams {
    /// The first day of the date range, inclusive.
    pub start_date: Option<String>,
    /// The last day of the date range, inclusive.
    pub end_date: Option<String>,
}

/// A route handler for the caller's total income, total expenses and balance.
pub async fn get_summary_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<impl IntoResponse, Error> {
    let summary = state
        .db_pool
        .run(move |connection| get_summary(user_id, connection))
        .await?;

    Ok(Json(summary))
}

/// A route handler for the caller's expenses summed per category.
///
/// # Errors
///
/// Responds with 400 Bad Request if the date range is invalid, and with 404
/// Not Found if there are no expenses for the caller in the range.
pub async fn get_categories_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    query: Result<Query<CategoryQueryParams>, QueryRejection>,
) -> Result<impl IntoResponse, Error> {
    let Query(params) = query?;
    let date_range =
        DateRange::from_params(params.start_date.as_deref(), params.end_date.as_deref())?;

    let breakdown = state
        .db_pool
        .run(move |connection| get_category_breakdown(user_id, date_range, connection))
        .await?;

    Ok(Json(breakdown))
}


#[cfg(test)]
mod categories_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints,
        test_utils::{create_test_transaction, get_test_server, register_test_user},
    };

    async fn add_expense(
        server: &axum_test::TestServer,
        token: &str,
        amount: f64,
        category: &str,
        date: &str,
    ) {
        create_test_transaction(
            server,
            token,
            json!({
                "description": "Test",
                "amount": amount,
                "type": "expense",
                "date": date,
                "category": category,
            }),
        )
        .await;
    }

    #[tokio::test]
    async fn groups_expenses_by_category() {
        let server = get_test_server();
        let (token, _) = register_test_user(&server, "Ana", "ana@example.com").await;
        add_expense(&server, &token, 25.5, "Alimentação", "2024-01-10").await;
        add_expense(&server, &token, 10.0, "Transporte", "2024-01-11").await;
        add_expense(&server, &token, 20.0, "Alimentação", "2024-01-12").await;

        let response = server
            .get(endpoints::TRANSACTION_CATEGORIES)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Vec<serde_json::Value>>();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0]["category"], "Alimentação");
        assert_eq!(body[0]["value"].as_f64(), Some(45.5));
        assert_eq!(body[1]["category"], "Transporte");
        assert_eq!(body[1]["value"].as_f64(), Some(10.0));
    }

    #[tokio::test]
    async fn no_expenses_in_range_is_not_found() {
        let server = get_test_server();
        let (token, _) = register_test_user(&server, "Ana", "ana@example.com").await;
        add_expense(&server, &token, 25.5, "Alimentação", "2024-01-10").await;

        let response = server
            .get(endpoints::TRANSACTION_CATEGORIES)
            .authorization_bearer(&token)
            .add_query_param("start_date", "2024-02-01")
            .add_query_param("end_date", "2024-02-29")
            .await;

        response.assert_status_not_found();
        assert_eq!(response.json::<serde_json::Value>()["code"], "not_found");
    }

    #[tokio::test]
    async fn bad_date_range_is_rejected() {
        let server = get_test_server();
        let (token, _) = register_test_user(&server, "Ana", "ana@example.com").await;
        add_expense(&server, &token, 25.5, "Alimentação", "2024-01-10").await;

        server
            .get(endpoints::TRANSACTION_CATEGORIES)
            .authorization_bearer(&token)
            .add_query_param("start_date", "2024-02-30")
            .add_query_param("end_date", "2024-03-01")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get(endpoints::TRANSACTION_CATEGORIES)
            .authorization_bearer(&token)
            .add_query_param("start_date", "2024-03-01")
            .add_query_param("end_date", "2024-01-01")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn other_users_expenses_are_not_counted() {
        let server = get_test_server();
        let (ana_token, _) = register_test_user(&server, "Ana", "ana@example.com").await;
        let (bruno_token, _) = register_test_user(&server, "Bruno", "bruno@example.com").await;
        add_expense(&server, &ana_token, 25.5, "Alimentação", "2024-01-10").await;

        server
            .get(endpoints::TRANSACTION_CATEGORIES)
            .authorization_bearer(&bruno_token)
            .await
            .assert_status_not_found();
    }
}
