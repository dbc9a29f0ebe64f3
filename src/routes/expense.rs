//! Route handlers for creating, listing, updating and deleting expenses.
//!
//! Every handler scopes its store calls to the authenticated user from the
//! bearer token, so one user can never see or modify another user's expenses.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::Claims,
    models::{Category, Expense, ExpenseChanges, ExpenseID, NewExpense},
    stores::{ExpenseFilter, ExpenseStore, UserStore},
};

/// The data for recording a new expense.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseData {
    /// The amount of money spent.
    pub amount: Decimal,
    /// The category to file the expense under.
    pub category: Category,
    /// A short note describing the expense.
    pub note: Option<String>,
    /// The date the money was spent. Defaults to today when omitted.
    pub date: Option<Date>,
}

/// A route handler for recording a new expense.
///
/// # Errors
///
/// Returns an [Error::Validation] if the amount is negative or the note is
/// too long.
pub async fn create_expense<E, U>(
    State(mut state): State<AppState<E, U>>,
    claims: Claims,
    Json(data): Json<CreateExpenseData>,
) -> Result<(StatusCode, Json<Expense>), Error>
where
    E: ExpenseStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let today = OffsetDateTime::now_utc().date();
    let new_expense = NewExpense::new(data.amount, data.category, data.note, data.date, today)?;

    let expense = state.expense_store.create(claims.user_id(), new_expense)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// A route handler for listing the user's expenses, newest first.
///
/// The query string may narrow the result by category, date range or calendar
/// month, see [ExpenseFilter].
pub async fn get_expenses<E, U>(
    State(state): State<AppState<E, U>>,
    claims: Claims,
    Query(filter): Query<ExpenseFilter>,
) -> Result<Json<Vec<Expense>>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let expenses = state.expense_store.get_query(claims.user_id(), filter)?;

    Ok(Json(expenses))
}

/// A route handler for fetching a single expense by its ID.
///
/// # Errors
///
/// Returns an [Error::NotFound] if the expense does not exist or belongs to
/// another user.
pub async fn get_expense<E, U>(
    State(state): State<AppState<E, U>>,
    claims: Claims,
    Path(expense_id): Path<i64>,
) -> Result<Json<Expense>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let expense = state
        .expense_store
        .get(claims.user_id(), ExpenseID::new(expense_id))?;

    Ok(Json(expense))
}

/// A route handler for partially updating an expense.
///
/// Only the fields present in the request body are changed.
///
/// # Errors
///
/// Returns an [Error::Validation] if a present field fails validation, or an
/// [Error::NotFound] if the expense does not exist or belongs to another
/// user.
pub async fn update_expense<E, U>(
    State(mut state): State<AppState<E, U>>,
    claims: Claims,
    Path(expense_id): Path<i64>,
    Json(changes): Json<ExpenseChanges>,
) -> Result<Json<Expense>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let expense =
        state
            .expense_store
            .update(claims.user_id(), ExpenseID::new(expense_id), changes)?;

    Ok(Json(expense))
}

/// A route handler for deleting an expense.
///
/// # Errors
///
/// Returns an [Error::NotFound] if the expense does not exist or belongs to
/// another user.
pub async fn delete_expense<E, U>(
    State(mut state): State<AppState<E, U>>,
    claims: Claims,
    Path(expense_id): Path<i64>,
) -> Result<Json<Value>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    state
        .expense_store
        .delete(claims.user_id(), ExpenseID::new(expense_id))?;

    Ok(Json(json!({ "message": "expense deleted" })))
}
