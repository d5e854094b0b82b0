//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/users/{user_id}', use [format_endpoint].

/// The root route which confirms the server is running.
pub const ROOT: &str = "/";
/// The route for creating a new account.
pub const REGISTER: &str = "/users/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/users/login";
/// The route for renewing the caller's token.
pub const REFRESH_TOKEN: &str = "/users/refresh-token";
/// The route to access a single user's account.
pub const USER: &str = "/users/{user_id}";
/// The route to create and list transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the caller's income, expense and balance totals.
pub const TRANSACTION_SUMMARY: &str = "/transactions/summary";
/// The route for the caller's expenses grouped by category.
pub const TRANSACTION_CATEGORIES: &str = "/transactions/categories";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is the text between the first left brace and the following
/// right brace. For example, in the endpoint path '/users/{user_id}',
/// '{user_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
