//! Defines the core data models and database queries for transactions.
//!
//! Every query takes the owner's [UserID] and matches on it, so a transaction
//! that belongs to someone else behaves exactly like one that does not exist.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::Serialize;
use time::Date;

use crate::{
    CredentialError, Error, UserID,
    database_id::TransactionId,
    transaction::{form::ValidatedTransaction, money::Money},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    Expense,
}

impl TransactionType {
    /// Parse a transaction type, ignoring case and surrounding whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if text.eq_ignore_ascii_case("income") {
            Some(Self::Income)
        } else if text.eq_ignore_ascii_case("expense") {
            Some(Self::Expense)
        } else {
            None
        }
    }

    /// The lowercase name stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        TransactionType::parse(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown transaction type {text:?}").into()))
    }
}

/// An expense or income recorded by a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// How much money was earned or spent, always greater than zero.
    pub amount: Money,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// A free-form category, e.g. "Alimentação".
    pub category: String,
    /// The user that owns the transaction.
    pub user_id: UserID,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected by every transaction query, in the order that
/// [map_transaction_row] expects.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, description, amount, type, date, category, user_id";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount INTEGER NOT NULL CHECK (amount > 0),
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                date TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT 'Outros',
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
                )",
        (),
    )?;

    // Every query filters on the owner and most on the date as well.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction owned by `user_id` and return its ID.
///
/// # Errors
/// This function will return a:
/// - [Error::Unauthenticated] if `user_id` no longer belongs to a registered
///   user, e.g. the account was deleted after its token was issued,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    transaction: &ValidatedTransaction,
    connection: &Connection,
) -> Result<TransactionId, Error> {
    connection
        .execute(
            "INSERT INTO \"transaction\" (description, amount, type, date, category, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &transaction.description,
                transaction.amount,
                transaction.kind,
                transaction.date,
                &transaction.category,
                user_id.as_i64(),
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(sql_error, _)
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                tracing::warn!("Rejected transaction for missing user {user_id}");
                Error::Unauthenticated(CredentialError::Invalid)
            }
            error => error.into(),
        })?;

    Ok(connection.last_insert_rowid())
}

/// Retrieve the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Replace every mutable field of the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    transaction: &ValidatedTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET description = ?1, amount = ?2, type = ?3, date = ?4, category = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            &transaction.description,
            transaction.amount,
            transaction.kind,
            transaction.date,
            &transaction.category,
            id,
            user_id.as_i64(),
        ),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Delete the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        kind: row.get(3)?,
        date: row.get(4)?,
        category: row.get(5)?,
        user_id: UserID::new(row.get(6)?),
    })
}

// ============================================================================
// TESTS
// ============================================================================
