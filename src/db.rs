//! The pooled SQLite database that backs the application.

use std::{fmt::Debug, path::Path, time::Duration};

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, TransactionBehavior};

use crate::{Error, transaction::create_transaction_table, user::create_user_table};

/// The default maximum number of open connections in the pool.
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// How long a caller waits for a free connection before giving up.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// A bounded pool of SQLite connections.
///
/// Callers that find every connection checked out wait until one is returned
/// (up to a timeout) instead of failing immediately. Every connection has
/// foreign keys enabled so that deleting a user removes their transactions.
#[derive(Clone)]
pub struct DbPool {
    pool: Pool<SqliteConnectionManager>,
}

impl DbPool {
    /// Open a pool of at most `max_size` connections to the database file at `path`.
    ///
    /// # Errors
    /// Returns [Error::PoolError] if the initial connections cannot be opened.
    pub fn open(path: impl AsRef<Path>, max_size: u32) -> Result<Self, Error> {
        let manager = SqliteConnectionManager::file(path).with_init(configure_connection);

        let pool = Pool::builder()
            .max_size(max_size)
            .connection_timeout(CONNECTION_TIMEOUT)
            .build(manager)?;

        Ok(Self { pool })
    }

    /// Open a pool holding a single connection to a fresh in-memory database.
    ///
    /// Each in-memory SQLite connection is its own database, so the pool is
    /// limited to one connection that is never recycled.
    ///
    /// # Errors
    /// Returns [Error::PoolError] if the connection cannot be opened.
    pub fn open_in_memory() -> Result<Self, Error> {
        let manager = SqliteConnectionManager::memory().with_init(configure_connection);

        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(CONNECTION_TIMEOUT)
            .build(manager)?;

        Ok(Self { pool })
    }

    /// Check a connection out of the pool, blocking until one is free.
    ///
    /// # Errors
    /// Returns [Error::PoolError] if no connection became free before the timeout.
    pub fn get(&self) -> Result<PooledConnection<SqliteConnectionManager>, Error> {
        self.pool.get().map_err(Error::from)
    }

    /// Run `operation` with a pooled connection on tokio's blocking thread pool.
    ///
    /// # Errors
    /// Returns the error from `operation`, [Error::PoolError] if no connection
    /// could be checked out, or [Error::TaskError] if the task panicked.
    pub async fn run<F, T>(&self, operation: F) -> Result<T, Error>
    where
        F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let connection = pool.get()?;
            operation(&connection)
        })
        .await
        .map_err(|error| Error::TaskError(error.to_string()))?
    }

    /// The number of open and idle connections, for logging.
    pub fn state(&self) -> r2d2::State {
        self.pool.state()
    }
}

impl Debug for DbPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbPool")
            .field("state", &self.pool.state())
            .field("max_size", &self.pool.max_size())
            .finish()
    }
}

fn configure_connection(connection: &mut Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")
}

/// Create the application tables if they do not already exist.
///
/// The tables are created inside a single exclusive transaction.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
