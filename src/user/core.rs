//! Code for creating the user table and fetching users from the database.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// The password hash is never serialized, so a `User` can be sent to clients as is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address, unique across all users.
    pub email: String,
    /// The user's password hash.
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
}

/// A user's name and email address after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    /// The trimmed, non-empty display name.
    pub name: String,
    /// A syntactically valid email address.
    pub email: String,
}

impl UserProfile {
    /// Validate a name and email address.
    ///
    /// # Errors
    /// Returns [Error::Validation] if either field is missing or blank, or if
    /// `email` is not a valid email address.
    pub fn new(name: Option<&str>, email: Option<&str>) -> Result<Self, Error> {
        let name = name.map(str::trim).unwrap_or_default();
        let email = email.map(str::trim).unwrap_or_default();

        if name.is_empty() || email.is_empty() {
            return Err(Error::Validation(
                "name and email are required".to_owned(),
            ));
        }

        if EmailAddress::from_str(email).is_err() {
            return Err(Error::Validation(format!(
                "\"{email}\" is not a valid email address"
            )));
        }

        Ok(Self {
            name: name.to_owned(),
            email: email.to_owned(),
        })
    }
}

/// Create the user table.
///
/// Email addresses are compared case-insensitively.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if `email` is already registered,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    name: &str,
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (name, email, password) VALUES (?1, ?2, ?3)",
        (name, email, password_hash.as_ref()),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        name: name.to_owned(),
        email: email.to_owned(),
        password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`, ignoring case.
///
/// # Errors
///
/// This function will return an error if:
/// - `email` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password FROM user WHERE email = :email")?
        .query_row(&[(":email", &email.trim())], map_user_row)
        .map_err(|error| error.into())
}

/// Replace the name and email of the user `user_id`.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] if `user_id` does not belong to a registered user,
/// - [Error::DuplicateEmail] if the email belongs to another user,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn update_user(
    user_id: UserID,
    profile: &UserProfile,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET name = ?1, email = ?2 WHERE id = ?3",
        (&profile.name, &profile.email, user_id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Replace the password hash of the user `user_id`.
///
/// # Errors
///
/// Returns a [Error::NotFound] if `user_id` does not belong to a registered
/// user, or [Error::SqlError] if some other SQL related error occurred.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Delete the user `user_id` and, through the foreign key cascade, all of
/// their transactions.
///
/// # Errors
///
/// Returns a [Error::NotFound] if `user_id` does not belong to a registered
/// user, or [Error::SqlError] if some other SQL related error occurred.
pub fn delete_user(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM user WHERE id = ?1", (user_id.as_i64(),))?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash,
        db::initialize,
        user::core::{
            UserID, UserProfile, create_user, delete_user, get_user_by_email, get_user_by_id,
            update_user,
        },
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        initialize(&conn).expect("Could not create tables");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = create_user(
            "Ana",
            "ana@example.com",
            password_hash.clone(),
            &db_connection,
        )
        .unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.password_hash, password_hash);
    }

    #[test]
    fn insert_user_fails_on_duplicate_email_ignoring_case() {
        let db_connection = get_db_connection();
        create_user(
            "Ana",
            "ana@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let result = create_user(
            "Other Ana",
            "ANA@example.com",
            PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let id = UserID::new(42);

        assert_eq!(get_user_by_id(id, &db_connection), Err(Error::NotFound));
    }

    #[test]
    fn get_user_by_email_ignores_case() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "Ana",
            "ana@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let retrieved_user = get_user_by_email("Ana@Example.com", &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn update_user_replaces_name_and_email() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "Ana",
            "ana@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();
        let profile = UserProfile::new(Some("Ana Maria"), Some("anamaria@example.com")).unwrap();

        update_user(test_user.id, &profile, &db_connection).unwrap();

        let retrieved_user = get_user_by_id(test_user.id, &db_connection).unwrap();
        assert_eq!(retrieved_user.name, "Ana Maria");
        assert_eq!(retrieved_user.email, "anamaria@example.com");
    }

    #[test]
    fn delete_missing_user_is_not_found() {
        let db_connection = get_db_connection();

        assert_eq!(
            delete_user(UserID::new(7), &db_connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn profile_requires_valid_email() {
        assert!(matches!(
            UserProfile::new(Some("Ana"), Some("not an email")),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            UserProfile::new(Some("  "), Some("ana@example.com")),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            UserProfile::new(None, Some("ana@example.com")),
            Err(Error::Validation(_))
        ));
    }
}
