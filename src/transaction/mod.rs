//! Income and expense transactions: the data model, the validated write
//! path, the filtered list, the aggregates and their route handlers.
//!
//! Every database query in this module is scoped to the authenticated owner.

use axum::extract::FromRef;

use crate::{AppState, db::DbPool};

mod aggregation;
mod core;
mod create_endpoint;
mod date;
mod delete_endpoint;
mod edit_endpoint;
mod filter;
mod form;
mod list_endpoint;
mod money;
mod summary_endpoint;

#[cfg(test)]
mod test_utils;

pub use core::{
    Transaction, TransactionType, create_transaction, create_transaction_table,
    delete_transaction, get_transaction, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::update_transaction_endpoint;
pub use list_endpoint::{get_transaction_endpoint, list_transactions_endpoint};
pub use summary_endpoint::{get_categories_endpoint, get_summary_endpoint};

/// The state needed by the transaction route handlers.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database pool for managing transactions.
    pub db_pool: DbPool,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }
}
