//! Implements a SQLite backed expense store.
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row, params_from_iter, types::Type, types::Value};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, Expense, ExpenseChanges, ExpenseID, NewExpense, UserID},
    stores::{ExpenseFilter, ExpenseStore},
};

const EXPENSE_COLUMNS: &str = "id, user_id, amount, category, note, date, created_at";

/// Stores expenses in a SQLite database.
///
/// Amounts are stored as text in the canonical [Decimal] string form so that
/// sums never pass through binary floating point.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Create and insert a new expense into the database, owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::SqlError] if an SQL related error occurred.
    fn create(&mut self, owner: UserID, expense: NewExpense) -> Result<Expense, Error> {
        let created_at = OffsetDateTime::now_utc();

        let expense = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "INSERT INTO expense (user_id, amount, category, note, date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {EXPENSE_COLUMNS}"
            ))?
            .query_row(
                (
                    owner.as_i64(),
                    expense.amount().to_string(),
                    expense.category().as_str(),
                    expense.note(),
                    expense.date(),
                    created_at,
                ),
                Self::map_row,
            )?;

        Ok(expense)
    }

    /// Get the expense with `id` owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if the expense does not exist or belongs
    /// to another user, or an [Error::SqlError] if there are SQL related
    /// errors. The two not-found cases are indistinguishable on purpose.
    fn get(&self, owner: UserID, id: ExpenseID) -> Result<Expense, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "SELECT {EXPENSE_COLUMNS} FROM expense
                 WHERE id = :id AND user_id = :user_id"
            ))?
            .query_row(
                &[(":id", &id.as_i64()), (":user_id", &owner.as_i64())],
                Self::map_row,
            )
            .map_err(|e| e.into())
    }

    /// Query for `owner`'s expenses that match `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if the filter's month or year is out of
    /// range, or an [Error::SqlError] if there is an SQL error.
    fn get_query(&self, owner: UserID, filter: ExpenseFilter) -> Result<Vec<Expense>, Error> {
        let mut where_clause_parts = vec!["user_id = ?1".to_string()];
        let mut query_parameters = vec![Value::Integer(owner.as_i64())];

        if let Some(category) = filter.category {
            where_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(category.as_str().to_string()));
        }

        let (start_date, end_date) = filter.effective_bounds()?;

        if let Some(start_date) = start_date {
            where_clause_parts.push(format!("date >= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(start_date.to_string()));
        }

        if let Some(end_date) = end_date {
            where_clause_parts.push(format!("date <= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(end_date.to_string()));
        }

        let query_string = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE {} ORDER BY date DESC, id DESC",
            where_clause_parts.join(" AND ")
        );
        let params = params_from_iter(query_parameters.iter());

        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&query_string)?
            .query_map(params, Self::map_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
            .collect()
    }

    /// Apply `changes` to the expense with `id` owned by `owner`.
    ///
    /// Fields that are absent from `changes` keep their current value.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if a present field fails validation, an
    /// [Error::NotFound] if the expense does not exist or belongs to another
    /// user, or an [Error::SqlError] if there are SQL related errors.
    fn update(
        &mut self,
        owner: UserID,
        id: ExpenseID,
        changes: ExpenseChanges,
    ) -> Result<Expense, Error> {
        changes.validate()?;

        let current = self.get(owner, id)?;

        let amount = changes.amount.unwrap_or_else(|| current.amount());
        let category = changes.category.unwrap_or_else(|| current.category());
        let note = match changes.note {
            Some(note) => note.trim().to_string(),
            None => current.note().to_string(),
        };
        let date = changes.date.unwrap_or_else(|| current.date());

        let expense = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "UPDATE expense SET amount = ?1, category = ?2, note = ?3, date = ?4
                 WHERE id = ?5 AND user_id = ?6
                 RETURNING {EXPENSE_COLUMNS}"
            ))?
            .query_row(
                (
                    amount.to_string(),
                    category.as_str(),
                    note,
                    date,
                    id.as_i64(),
                    owner.as_i64(),
                ),
                Self::map_row,
            )?;

        Ok(expense)
    }

    /// Delete the expense with `id` owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if the expense does not exist or belongs
    /// to another user, or an [Error::SqlError] if there are SQL related
    /// errors.
    fn delete(&mut self, owner: UserID, id: ExpenseID) -> Result<(), Error> {
        let rows_deleted = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute(
                "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
                (id.as_i64(), owner.as_i64()),
            )?;

        if rows_deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteExpenseStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expense (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL REFERENCES user(id),
                    amount TEXT NOT NULL,
                    category TEXT NOT NULL,
                    note TEXT NOT NULL,
                    date TEXT NOT NULL,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteExpenseStore {
    type ReturnType = Expense;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let raw_user_id = row.get(offset + 1)?;
        let raw_amount: String = row.get(offset + 2)?;
        let raw_category: String = row.get(offset + 3)?;
        let note = row.get(offset + 4)?;
        let date = row.get(offset + 5)?;
        let created_at = row.get(offset + 6)?;

        let amount = Decimal::from_str(&raw_amount).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 2, Type::Text, Box::new(error))
        })?;

        Ok(Expense::new_unchecked(
            ExpenseID::new(raw_id),
            UserID::new(raw_user_id),
            amount,
            Category::from_stored_label(&raw_category),
            note,
            date,
            created_at,
        ))
    }
}
