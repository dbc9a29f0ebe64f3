//! This module defines the domain data types.

pub use category::Category;
pub use expense::{Expense, ExpenseChanges, ExpenseID, NewExpense};
pub use password::{PasswordHash, ValidatedPassword};
pub use user::{User, UserID, UserProfile};

mod category;
mod expense;
mod password;
mod user;
