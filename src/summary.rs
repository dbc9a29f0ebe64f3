//! Reduces a user's expenses into a monthly spending summary.
//!
//! The summary is derived data: it is recomputed from the current expense
//! records on every request and never persisted, so it cannot drift out of
//! sync with the store.

use std::{collections::BTreeMap, ops::RangeInclusive};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use time::{Date, Month};

use crate::{Error, models::Category, models::Expense};

/// A user's aggregated spending for one calendar month, measured against
/// their monthly budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// The calendar month the summary covers (1 = January).
    pub month: u8,
    /// The calendar year the summary covers.
    pub year: i32,
    /// The sum of all expense amounts in the month.
    pub total_spent: Decimal,
    /// The user's monthly budget at the time the summary was computed.
    pub budget: Decimal,
    /// The budget minus the total spent. Negative when over budget.
    pub remaining: Decimal,
    /// How much of the budget has been spent, as a percentage rounded
    /// half-up to two decimal places. Zero when the budget is zero.
    pub percentage_used: Decimal,
    /// The amount spent per category. Categories with no expenses are
    /// omitted rather than listed with a zero amount.
    pub category_breakdown: BTreeMap<Category, Decimal>,
    /// The number of expenses that contributed to the summary.
    pub expense_count: usize,
}

/// Reduce `expenses` and `budget` into a [MonthlySummary] for `month` and
/// `year`.
///
/// This is a pure function: the same inputs always produce the same summary,
/// and the order of `expenses` does not affect the result. The caller is
/// responsible for passing in the expenses that fall within the month, see
/// [month_bounds].
///
/// A zero budget yields a percentage of zero rather than a division error.
pub fn monthly_summary(
    expenses: &[Expense],
    budget: Decimal,
    month: u8,
    year: i32,
) -> MonthlySummary {
    let mut total_spent = Decimal::ZERO;
    let mut category_breakdown = BTreeMap::new();

    for expense in expenses {
        total_spent += expense.amount();

        *category_breakdown
            .entry(expense.category())
            .or_insert(Decimal::ZERO) += expense.amount();
    }

    let percentage_used = if budget > Decimal::ZERO {
        (total_spent / budget * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    MonthlySummary {
        month,
        year,
        total_spent,
        budget,
        remaining: budget - total_spent,
        percentage_used,
        category_breakdown,
        expense_count: expenses.len(),
    }
}

/// Fill in a partially specified month and year from `today`.
///
/// Each part defaults independently, so a caller may give a month and let the
/// year default to the current one, or vice versa.
pub fn resolve_month(month: Option<u8>, year: Option<i32>, today: Date) -> (u8, i32) {
    (
        month.unwrap_or(u8::from(today.month())),
        year.unwrap_or(today.year()),
    )
}

/// The inclusive date range covering the calendar month `month` of `year`.
///
/// # Errors
///
/// This function will return an [Error::Validation] if `month` is not in the
/// range 1-12 or `year` is outside the range of dates supported by [Date].
pub fn month_bounds(year: i32, month: u8) -> Result<RangeInclusive<Date>, Error> {
    let month = Month::try_from(month)
        .map_err(|_| Error::Validation("month must be a number from 1 to 12".to_string()))?;

    let first_day = Date::from_calendar_date(year, month, 1)
        .map_err(|_| Error::Validation(format!("the year {year} is not supported")))?;

    let last_day = first_day
        .replace_day(month.length(year))
        .map_err(|_| Error::Validation(format!("the year {year} is not supported")))?;

    Ok(first_day..=last_day)
}

#[cfg(test)]
mod monthly_summary_tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, OffsetDateTime, macros::date};

    use crate::models::{Category, Expense, ExpenseID, UserID};

    use super::monthly_summary;

    fn expense(id: i64, category: Category, amount: Decimal) -> Expense {
        Expense::new_unchecked(
            ExpenseID::new(id),
            UserID::new(1),
            amount,
            category,
            String::new(),
            date!(2025 - 03 - 10),
            OffsetDateTime::UNIX_EPOCH,
        )
    }

    fn sample_expenses() -> Vec<Expense> {
        vec![
            expense(1, Category::Food, dec!(100)),
            expense(2, Category::Food, dec!(50)),
            expense(3, Category::Travel, dec!(200)),
        ]
    }

    #[test]
    fn summary_of_expenses_over_budget() {
        let summary = monthly_summary(&sample_expenses(), dec!(300), 3, 2025);

        assert_eq!(summary.month, 3);
        assert_eq!(summary.year, 2025);
        assert_eq!(summary.total_spent, dec!(350));
        assert_eq!(summary.budget, dec!(300));
        assert_eq!(summary.remaining, dec!(-50));
        assert_eq!(summary.percentage_used, dec!(116.67));
        assert_eq!(summary.expense_count, 3);
        assert_eq!(
            summary.category_breakdown.get(&Category::Food),
            Some(&dec!(150))
        );
        assert_eq!(
            summary.category_breakdown.get(&Category::Travel),
            Some(&dec!(200))
        );
        assert_eq!(summary.category_breakdown.len(), 2);
    }

    #[test]
    fn summary_of_no_expenses() {
        let summary = monthly_summary(&[], dec!(500), 1, 2025);

        assert_eq!(summary.total_spent, Decimal::ZERO);
        assert_eq!(summary.remaining, dec!(500));
        assert_eq!(summary.percentage_used, Decimal::ZERO);
        assert!(summary.category_breakdown.is_empty());
        assert_eq!(summary.expense_count, 0);
    }

    #[test]
    fn zero_budget_gives_zero_percentage() {
        let expenses = vec![expense(1, Category::Bills, dec!(80))];

        let summary = monthly_summary(&expenses, Decimal::ZERO, 6, 2025);

        assert_eq!(summary.percentage_used, Decimal::ZERO);
        assert_eq!(summary.remaining, dec!(-80));
    }

    #[test]
    fn total_does_not_depend_on_expense_order() {
        let mut expenses = sample_expenses();

        let summary = monthly_summary(&expenses, dec!(300), 3, 2025);
        expenses.reverse();
        let reversed_summary = monthly_summary(&expenses, dec!(300), 3, 2025);

        assert_eq!(summary.total_spent, reversed_summary.total_spent);
        assert_eq!(
            summary.category_breakdown,
            reversed_summary.category_breakdown
        );
    }

    #[test]
    fn breakdown_sums_to_total() {
        let summary = monthly_summary(&sample_expenses(), dec!(300), 3, 2025);

        let breakdown_total: Decimal = summary.category_breakdown.values().sum();

        assert_eq!(breakdown_total, summary.total_spent);
    }

    #[test]
    fn summary_is_deterministic() {
        let expenses = sample_expenses();

        let first = monthly_summary(&expenses, dec!(300), 3, 2025);
        let second = monthly_summary(&expenses, dec!(300), 3, 2025);

        assert_eq!(first, second);
    }

    #[test]
    fn exact_decimal_sum_has_no_float_drift() {
        // 0.1 summed ten times must come out to exactly 1.
        let expenses: Vec<Expense> = (0..10)
            .map(|id| expense(id, Category::Misc, dec!(0.1)))
            .collect();

        let summary = monthly_summary(&expenses, dec!(1), 3, 2025);

        assert_eq!(summary.total_spent, dec!(1.0));
        assert_eq!(summary.percentage_used, dec!(100.00));
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 100 / 3000 * 100 = 3.333... and 100.05 / 1000 * 100 = 10.005.
        let expenses = vec![expense(1, Category::Food, dec!(100.05))];

        let summary = monthly_summary(&expenses, dec!(1000), 3, 2025);

        assert_eq!(summary.percentage_used, dec!(10.01));
    }

    #[test]
    fn summary_serializes_with_wire_field_names() {
        let summary = monthly_summary(&sample_expenses(), dec!(300), 3, 2025);

        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["totalSpent"], serde_json::json!(350.0));
        assert_eq!(json["percentageUsed"], serde_json::json!(116.67));
        assert_eq!(json["categoryBreakdown"]["Food"], serde_json::json!(150.0));
        assert_eq!(json["expenseCount"], serde_json::json!(3));
    }

    #[test]
    fn resolve_month_defaults_each_part_independently() {
        let today: Date = date!(2025 - 03 - 10);

        assert_eq!(super::resolve_month(None, None, today), (3, 2025));
        assert_eq!(super::resolve_month(Some(7), None, today), (7, 2025));
        assert_eq!(super::resolve_month(None, Some(2024), today), (3, 2024));
        assert_eq!(super::resolve_month(Some(7), Some(2024), today), (7, 2024));
    }
}
