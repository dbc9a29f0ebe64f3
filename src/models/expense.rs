//! This file defines the `Expense` type, the core type of the application, and
//! the types used to create and update expenses.

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    models::{Category, UserID},
};

/// A newtype wrapper for integer expense IDs.
/// This helps disambiguate expense IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseID(i64);

impl ExpenseID {
    /// Create an expense ID from an integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for ExpenseID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A single recorded expense: an amount of money spent on a date, filed under
/// a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    id: ExpenseID,
    user_id: UserID,
    amount: Decimal,
    category: Category,
    note: String,
    date: Date,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Expense {
    /// The maximum number of characters allowed in an expense note.
    pub const MAX_NOTE_CHARS: usize = 200;

    /// Create an expense from its parts without validating them.
    ///
    /// The caller should ensure the fields came from a trusted source such as
    /// a database row.
    pub fn new_unchecked(
        id: ExpenseID,
        user_id: UserID,
        amount: Decimal,
        category: Category,
        note: String,
        date: Date,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            user_id,
            amount,
            category,
            note,
            date,
            created_at,
        }
    }

    /// The ID of the expense.
    pub fn id(&self) -> ExpenseID {
        self.id
    }

    /// The ID of the user that recorded this expense.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The amount of money spent.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The category the expense is filed under.
    pub fn category(&self) -> Category {
        self.category
    }

    /// A short free-form note describing the expense.
    pub fn note(&self) -> &str {
        &self.note
    }

    /// The date the money was spent.
    pub fn date(&self) -> Date {
        self.date
    }

    /// When the expense record was created.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

fn validate_amount(amount: Decimal) -> Result<(), Error> {
    if amount < Decimal::ZERO {
        return Err(Error::Validation(
            "expense amount must not be negative".to_string(),
        ));
    }

    Ok(())
}

fn validate_note(note: &str) -> Result<(), Error> {
    if note.chars().count() > Expense::MAX_NOTE_CHARS {
        return Err(Error::Validation(format!(
            "expense note must not be longer than {} characters",
            Expense::MAX_NOTE_CHARS
        )));
    }

    Ok(())
}

/// The data for creating a new expense, validated and with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    amount: Decimal,
    category: Category,
    note: String,
    date: Date,
}

impl NewExpense {
    /// Validate the data for a new expense.
    ///
    /// A missing `note` defaults to the empty string and the note is trimmed
    /// of surrounding whitespace. A missing `date` defaults to `today`.
    ///
    /// # Errors
    ///
    /// This function will return an error if `amount` is negative or if `note`
    /// is longer than [Expense::MAX_NOTE_CHARS] characters.
    pub fn new(
        amount: Decimal,
        category: Category,
        note: Option<String>,
        date: Option<Date>,
        today: Date,
    ) -> Result<Self, Error> {
        validate_amount(amount)?;

        let note = note.as_deref().unwrap_or_default().trim().to_string();
        validate_note(&note)?;

        Ok(Self {
            amount,
            category,
            note,
            date: date.unwrap_or(today),
        })
    }

    /// The amount of money spent.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The category the expense is filed under.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The note describing the expense.
    pub fn note(&self) -> &str {
        &self.note
    }

    /// The date the money was spent.
    pub fn date(&self) -> Date {
        self.date
    }
}

/// A partial update to an expense.
///
/// Fields that are `None` keep their current value. Setting `note` to the
/// empty string clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseChanges {
    /// The new amount, if it should change.
    pub amount: Option<Decimal>,
    /// The new category, if it should change.
    pub category: Option<Category>,
    /// The new note, if it should change.
    pub note: Option<String>,
    /// The new date, if it should change.
    pub date: Option<Date>,
}

impl ExpenseChanges {
    /// Whether the update changes anything at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check that every field present in the update is valid.
    ///
    /// # Errors
    ///
    /// This function will return an error if `amount` is negative or if `note`
    /// is longer than [Expense::MAX_NOTE_CHARS] characters.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }

        if let Some(note) = &self.note {
            // Notes are trimmed before they are stored, so the limit applies
            // to the trimmed text.
            validate_note(note.trim())?;
        }

        Ok(())
    }
}


#[cfg(test)]
mod expense_changes_tests {
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        models::{Category, ExpenseChanges},
    };

    #[test]
    fn default_is_empty() {
        assert!(ExpenseChanges::default().is_empty());
    }

    #[test]
    fn change_is_not_empty() {
        let changes = ExpenseChanges {
            note: Some("".to_string()),
            ..Default::default()
        };

        assert!(!changes.is_empty());
    }

    #[test]
    fn validate_fails_on_negative_amount() {
        let changes = ExpenseChanges {
            amount: Some(dec!(-1)),
            ..Default::default()
        };

        assert!(matches!(changes.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn validate_fails_on_long_note() {
        let changes = ExpenseChanges {
            note: Some("a".repeat(201)),
            ..Default::default()
        };

        assert!(matches!(changes.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn validate_succeeds_on_partial_change() {
        let changes = ExpenseChanges {
            category: Some(Category::Travel),
            ..Default::default()
        };

        assert_eq!(changes.validate(), Ok(()));
    }
}
