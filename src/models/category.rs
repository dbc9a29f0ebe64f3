//! This file defines the fixed set of spending categories that expenses are filed under.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The spending category an expense is filed under.
///
/// Expenses must use one of the fixed set of categories below. The order of
/// the variants is used to break ties when categories are ranked by amount
/// spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Groceries and eating out.
    Food,
    /// Transport, trips and holidays.
    Travel,
    /// Movies, games and other leisure.
    Entertainment,
    /// General retail purchases.
    Shopping,
    /// Rent, utilities and other recurring charges.
    Bills,
    /// Courses, books and tuition.
    Education,
    /// Medical costs, pharmacy and fitness.
    Health,
    /// Anything that does not fit the other categories.
    Misc,
    /// Fallback for stored labels that do not match a known category.
    ///
    /// This variant cannot be used when creating or updating an expense, it
    /// only appears when reading rows written under a label that is no longer
    /// recognised.
    #[serde(skip_deserializing)]
    Unclassified,
}

impl Category {
    /// The category's label as stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Education => "Education",
            Category::Health => "Health",
            Category::Misc => "Misc",
            Category::Unclassified => "Unclassified",
        }
    }

    /// Map a label read from the database to a category.
    ///
    /// Labels that do not match a known category map to
    /// [Category::Unclassified] so that old rows never prevent a user's
    /// expenses from loading.
    pub fn from_stored_label(label: &str) -> Self {
        match label {
            "Food" => Category::Food,
            "Travel" => Category::Travel,
            "Entertainment" => Category::Entertainment,
            "Shopping" => Category::Shopping,
            "Bills" => Category::Bills,
            "Education" => Category::Education,
            "Health" => Category::Health,
            "Misc" => Category::Misc,
            _ => Category::Unclassified,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
