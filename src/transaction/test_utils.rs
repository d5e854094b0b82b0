//! Fixtures for the transaction database tests.

use rusqlite::Connection;
use time::Date;

use crate::{
    PasswordHash, UserID,
    db::initialize,
    transaction::{TransactionType, form::ValidatedTransaction, money::Money},
    user::create_user,
};

pub fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    initialize(&conn).expect("Could not create tables");
    conn
}

pub fn insert_user(email: &str, conn: &Connection) -> UserID {
    create_user("Test User", email, PasswordHash::new_unchecked("hunter2"), conn)
        .expect("Could not create test user")
        .id
}

pub fn new_transaction(cents: i64, kind: TransactionType, date: Date) -> ValidatedTransaction {
    ValidatedTransaction {
        description: "Test transaction".to_owned(),
        amount: Money::from_cents(cents),
        kind,
        date,
        category: "Outros".to_owned(),
    }
}
