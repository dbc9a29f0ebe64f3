//! Derives display-oriented views from a [MonthlySummary]: the budget usage
//! band shown as a warning colour, and categories ranked by amount spent.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::{models::Category, summary::MonthlySummary};

/// The percentage of the budget above which spending counts as near-budget.
const NEAR_BUDGET_PERCENTAGE: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// A classification of how much of the monthly budget has been used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BudgetBand {
    /// At most 80% of the budget has been spent.
    Normal,
    /// More than 80% but no more than 100% of the budget has been spent.
    NearBudget,
    /// More than 100% of the budget has been spent.
    OverBudget,
}

impl BudgetBand {
    /// Classify `percentage_used` into a band.
    ///
    /// The bands are mutually exclusive: over-budget is checked first, then
    /// near-budget, and anything else is normal.
    pub fn classify(percentage_used: Decimal) -> Self {
        if percentage_used > Decimal::ONE_HUNDRED {
            BudgetBand::OverBudget
        } else if percentage_used > NEAR_BUDGET_PERCENTAGE {
            BudgetBand::NearBudget
        } else {
            BudgetBand::Normal
        }
    }
}

/// One category's amount and its share of the month's total spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    /// The spending category.
    pub category: Category,
    /// The amount spent in the category over the month.
    pub amount: Decimal,
    /// The category's share of the total spent, as a percentage rounded
    /// half-up to two decimal places. Zero when nothing was spent.
    pub share_of_total: Decimal,
}

/// The summary's category breakdown sorted by amount spent, largest first.
///
/// Ties are broken by category so the ranking is deterministic.
pub fn ranked_categories(summary: &MonthlySummary) -> Vec<CategoryShare> {
    let mut shares: Vec<CategoryShare> = summary
        .category_breakdown
        .iter()
        .map(|(&category, &amount)| {
            let share_of_total = if summary.total_spent > Decimal::ZERO {
                (amount / summary.total_spent * Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            } else {
                Decimal::ZERO
            };

            CategoryShare {
                category,
                amount,
                share_of_total,
            }
        })
        .collect();

    shares.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));

    shares
}
