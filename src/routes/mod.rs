//! This module defines the REST API's routes and their handlers.
//!
//! Routes under `/api/auth` (except signup and login) and `/api/expenses`
//! require a bearer token; handlers enforce this by taking a
//! [Claims](crate::auth::Claims) argument.

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    stores::{ExpenseStore, UserStore},
};

mod auth;
pub mod endpoints;
mod expense;
mod summary;

/// Return a router with all the app's routes.
pub fn build_router<E, U>(state: AppState<E, U>) -> Router
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::SIGN_UP, post(auth::sign_up::<E, U>))
        .route(endpoints::LOG_IN, post(auth::log_in::<E, U>))
        .route(endpoints::PROFILE, get(auth::get_profile::<E, U>))
        .route(endpoints::BUDGET, put(auth::update_budget::<E, U>))
        .route(
            endpoints::EXPENSES,
            post(expense::create_expense::<E, U>).get(expense::get_expenses::<E, U>),
        )
        .route(
            endpoints::EXPENSE_SUMMARY,
            get(summary::get_monthly_summary::<E, U>),
        )
        .route(
            endpoints::EXPENSE,
            get(expense::get_expense::<E, U>)
                .put(expense::update_expense::<E, U>)
                .delete(expense::delete_expense::<E, U>),
        )
        .with_state(state)
}

/// A route handler that reports whether the server is up.
async fn get_health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
