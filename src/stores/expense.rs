//! Defines the expense store trait and the filter used to query it.

use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    models::{Category, Expense, ExpenseChanges, ExpenseID, NewExpense, UserID},
    summary::month_bounds,
};

/// Handles the creation and retrieval of expenses.
///
/// Every operation is scoped to an owning user. Implementers must not return
/// or modify another user's expenses, a lookup for an expense that belongs to
/// someone else must fail with [Error::NotFound] exactly as if the expense
/// did not exist.
pub trait ExpenseStore {
    /// Create a new expense in the store, owned by `owner`.
    fn create(&mut self, owner: UserID, expense: NewExpense) -> Result<Expense, Error>;

    /// Retrieve the expense with `id` owned by `owner`.
    fn get(&self, owner: UserID, id: ExpenseID) -> Result<Expense, Error>;

    /// Retrieve `owner`'s expenses that match `filter`, newest first.
    fn get_query(&self, owner: UserID, filter: ExpenseFilter) -> Result<Vec<Expense>, Error>;

    /// Apply `changes` to the expense with `id` owned by `owner` and return
    /// the updated expense.
    fn update(
        &mut self,
        owner: UserID,
        id: ExpenseID,
        changes: ExpenseChanges,
    ) -> Result<Expense, Error>;

    /// Delete the expense with `id` owned by `owner`.
    fn delete(&mut self, owner: UserID, id: ExpenseID) -> Result<(), Error>;
}

/// Defines which expenses should be fetched by [ExpenseStore::get_query].
///
/// An empty filter matches all of the owner's expenses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseFilter {
    /// Include only expenses filed under this category.
    pub category: Option<Category>,
    /// Include only expenses dated on or after this date.
    pub start_date: Option<Date>,
    /// Include only expenses dated on or before this date.
    pub end_date: Option<Date>,
    /// Together with `year`, include only expenses within this calendar month
    /// (1 = January).
    pub month: Option<u8>,
    /// Together with `month`, include only expenses within this calendar year.
    pub year: Option<i32>,
}

impl ExpenseFilter {
    /// The date range the filter selects, as inclusive lower and upper bounds.
    ///
    /// Explicit `start_date`/`end_date` bounds take precedence: the
    /// `month`/`year` pair is only consulted when both parts are present and
    /// neither explicit bound is set. A lone `month` or `year` is ignored.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::Validation] if `month` is not in
    /// the range 1-12 or `year` is outside the supported range of dates.
    pub fn effective_bounds(&self) -> Result<(Option<Date>, Option<Date>), Error> {
        if self.start_date.is_some() || self.end_date.is_some() {
            return Ok((self.start_date, self.end_date));
        }

        if let (Some(month), Some(year)) = (self.month, self.year) {
            let range = month_bounds(year, month)?;
            return Ok((Some(*range.start()), Some(*range.end())));
        }

        Ok((None, None))
    }
}
