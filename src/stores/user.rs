//! Defines the user store trait.

use email_address::EmailAddress;
use rust_decimal::Decimal;

use crate::{
    Error,
    models::{PasswordHash, User, UserID},
};

/// Handles the creation and retrieval of users.
pub trait UserStore {
    /// Create a new user in the store.
    fn create(
        &mut self,
        email: EmailAddress,
        name: String,
        password_hash: PasswordHash,
        monthly_budget: Decimal,
    ) -> Result<User, Error>;

    /// Retrieve a user from the store by their `id`.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Retrieve a user from the store by their `email` address.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;

    /// Replace the monthly budget of the user with `id` and return the
    /// updated user.
    fn set_monthly_budget(&mut self, id: UserID, monthly_budget: Decimal) -> Result<User, Error>;
}
