//! Implements a SQLite backed user store.
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use email_address::EmailAddress;
use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User, UserID},
    stores::UserStore,
};

/// Handles the creation and retrieval of User objects.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Errors
    ///
    /// Returns an [Error::DuplicateEmail] if `email` is already in use, or an
    /// [Error::SqlError] if an SQL related error occurred.
    fn create(
        &mut self,
        email: EmailAddress,
        name: String,
        password_hash: PasswordHash,
        monthly_budget: Decimal,
    ) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "INSERT INTO user (email, name, monthly_budget, password)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, email, name, monthly_budget, password",
            )?
            .query_row(
                (
                    email.to_string(),
                    &name,
                    monthly_budget.to_string(),
                    password_hash.to_string(),
                ),
                Self::map_row,
            )?;

        Ok(user)
    }

    /// Get the user from the database that has the specified `id`, or return [Error::NotFound] if such user does not exist.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if there is no user with the specified ID or [Error::SqlError] if there are SQL related errors.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, email, name, monthly_budget, password FROM user
                 WHERE id = :id",
            )?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|e| e.into())
    }

    /// Get the user from the database that has the specified `email` address, or return [Error::NotFound] if such user does not exist.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if there is no user with the specified email or [Error::SqlError] if there are SQL related errors.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, email, name, monthly_budget, password FROM user
                 WHERE email = :email",
            )?
            .query_row(&[(":email", &email.to_string())], Self::map_row)
            .map_err(|e| e.into())
    }

    /// Replace the monthly budget of the user with `id`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if there is no user with the specified ID or [Error::SqlError] if there are SQL related errors.
    fn set_monthly_budget(&mut self, id: UserID, monthly_budget: Decimal) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "UPDATE user SET monthly_budget = ?1 WHERE id = ?2
                 RETURNING id, email, name, monthly_budget, password",
            )?
            .query_row((monthly_budget.to_string(), id.as_i64()), Self::map_row)?;

        Ok(user)
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    email TEXT UNIQUE NOT NULL,
                    name TEXT NOT NULL,
                    monthly_budget TEXT NOT NULL,
                    password TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let raw_email: String = row.get(offset + 1)?;
        let name = row.get(offset + 2)?;
        let raw_budget: String = row.get(offset + 3)?;
        let raw_password_hash: String = row.get(offset + 4)?;

        let monthly_budget = Decimal::from_str(&raw_budget).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 3, Type::Text, Box::new(error))
        })?;

        Ok(User::new_unchecked(
            UserID::new(raw_id),
            EmailAddress::new_unchecked(raw_email),
            name,
            monthly_budget,
            PasswordHash::new_unchecked(&raw_password_hash),
        ))
    }
}
