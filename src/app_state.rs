//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;

use crate::{
    AppConfig,
    stores::{ExpenseStore, UserStore},
};

/// The state of the REST server.
///
/// The state is generic over the store traits so that route handlers can be
/// tested against fake stores without a database.
#[derive(Clone)]
pub struct AppState<E, U>
where
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// The config holding the JWT signing keys and token lifetime.
    pub config: AppConfig,
    /// The store for the users' [expenses](crate::models::Expense).
    pub expense_store: E,
    /// The store for registered [users](crate::models::User).
    pub user_store: U,
}

impl<E, U> AppState<E, U>
where
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(config: AppConfig, expense_store: E, user_store: U) -> Self {
        Self {
            config,
            expense_store,
            user_store,
        }
    }
}

// This impl lets the Claims extractor get the JWT keys from the app state.
impl<E, U> FromRef<AppState<E, U>> for AppConfig
where
    E: ExpenseStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<E, U>) -> Self {
        state.config.clone()
    }
}
