//! Contains traits and implementations for objects that store the domain [models](crate::models).

mod expense;
mod user;

pub mod sqlite;

pub use expense::{ExpenseFilter, ExpenseStore};
pub use sqlite::{SQLiteExpenseStore, SQLiteUserStore};
pub use user::UserStore;
