//! This file defines a user of the application and its supporting types.

use std::fmt::Display;

use email_address::EmailAddress;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PasswordHash;

/// A newtype wrapper for integer user IDs.
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from an integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer ID.
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
/// This type holds the user's password hash, so it must never be serialized
/// into a response. Use [UserProfile] for anything that leaves the server.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserID,
    email: EmailAddress,
    name: String,
    monthly_budget: Decimal,
    password_hash: PasswordHash,
}

impl User {
    /// Create a user from its parts without validating them.
    ///
    /// The caller should ensure the fields came from a trusted source such as
    /// a database row.
    pub fn new_unchecked(
        id: UserID,
        email: EmailAddress,
        name: String,
        monthly_budget: Decimal,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            email,
            name,
            monthly_budget,
            password_hash,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The user's monthly spending budget.
    pub fn monthly_budget(&self) -> Decimal {
        self.monthly_budget
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// The public view of a user that is safe to send to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The user's ID in the database.
    pub id: UserID,
    /// The email address associated with the user.
    pub email: EmailAddress,
    /// The user's display name.
    pub name: String,
    /// The user's monthly spending budget.
    pub monthly_budget: Decimal,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            monthly_budget: user.monthly_budget,
        }
    }
}

#[cfg(test)]
mod user_tests {
    use std::str::FromStr;

    use email_address::EmailAddress;
    use rust_decimal_macros::dec;

    use crate::models::{PasswordHash, User, UserID, UserProfile};

    #[test]
    fn profile_does_not_contain_password_hash() {
        let user = User::new_unchecked(
            UserID::new(1),
            EmailAddress::from_str("foo@bar.baz").unwrap(),
            "Foo".to_string(),
            dec!(1500),
            PasswordHash::new_unchecked("hunter2"),
        );

        let profile = UserProfile::from(&user);
        let json = serde_json::to_string(&profile).unwrap();

        assert!(!json.contains("hunter2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn profile_uses_camel_case_field_names() {
        let user = User::new_unchecked(
            UserID::new(1),
            EmailAddress::from_str("foo@bar.baz").unwrap(),
            "Foo".to_string(),
            dec!(1500),
            PasswordHash::new_unchecked("hunter2"),
        );

        let json = serde_json::to_value(UserProfile::from(&user)).unwrap();

        assert_eq!(json["monthlyBudget"], serde_json::json!(1500.0));
        assert_eq!(json["name"], "Foo");
    }
}
