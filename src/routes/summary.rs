//! The route handler for the monthly spending summary.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Claims,
    report::{BudgetBand, CategoryShare, ranked_categories},
    stores::{ExpenseFilter, ExpenseStore, UserStore},
    summary::{MonthlySummary, month_bounds, monthly_summary, resolve_month},
};

/// The month a summary is requested for. A missing month or year defaults to
/// the current one.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// The calendar month to summarise (1 = January).
    pub month: Option<u8>,
    /// The calendar year to summarise.
    pub year: Option<i32>,
}

/// A [MonthlySummary] together with the derived display fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    /// The aggregated spending for the month.
    #[serde(flatten)]
    pub summary: MonthlySummary,
    /// How close the month's spending is to the budget.
    pub band: BudgetBand,
    /// The categories of the month ranked by amount spent, largest first.
    pub ranked_categories: Vec<CategoryShare>,
}

/// A route handler that computes the logged in user's spending summary for a
/// calendar month.
///
/// The summary is recomputed from the stored expenses on every request.
///
/// # Errors
///
/// Returns an [Error::Validation] if the month or year is out of range.
pub async fn get_monthly_summary<E, U>(
    State(state): State<AppState<E, U>>,
    claims: Claims,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryReport>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let today = OffsetDateTime::now_utc().date();
    let (month, year) = resolve_month(query.month, query.year, today);
    let bounds = month_bounds(year, month)?;

    let filter = ExpenseFilter {
        start_date: Some(*bounds.start()),
        end_date: Some(*bounds.end()),
        ..Default::default()
    };
    let expenses = state.expense_store.get_query(claims.user_id(), filter)?;
    let user = state.user_store.get(claims.user_id())?;

    let summary = monthly_summary(&expenses, user.monthly_budget(), month, year);
    let band = BudgetBand::classify(summary.percentage_used);
    let ranked_categories = ranked_categories(&summary);

    Ok(Json(SummaryReport {
        summary,
        band,
        ranked_categories,
    }))
}

#[cfg(test)]
mod summary_route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::routes::{
        endpoints,
        test_utils::{sign_up, test_server},
    };

    async fn add_expense(server: &TestServer, token: &str, body: Value) {
        server
            .post(endpoints::EXPENSES)
            .authorization_bearer(token)
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);
    }

    async fn get_summary(server: &TestServer, token: &str, month: u8, year: i32) -> Value {
        let response = server
            .get(endpoints::EXPENSE_SUMMARY)
            .add_query_param("month", month)
            .add_query_param("year", year)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();

        response.json::<Value>()
    }

    #[tokio::test]
    async fn summary_of_an_over_budget_month() {
        let server = test_server();
        let token = sign_up(&server, "foo@bar.baz", 300.0).await;

        add_expense(
            &server,
            &token,
            json!({ "amount": 100, "category": "Food", "date": "2025-03-05" }),
        )
        .await;
        add_expense(
            &server,
            &token,
            json!({ "amount": 50, "category": "Food", "date": "2025-03-10" }),
        )
        .await;
        add_expense(
            &server,
            &token,
            json!({ "amount": 200, "category": "Travel", "date": "2025-03-15" }),
        )
        .await;

        let summary = get_summary(&server, &token, 3, 2025).await;

        assert_eq!(summary["month"], json!(3));
        assert_eq!(summary["year"], json!(2025));
        assert_eq!(summary["totalSpent"], json!(350.0));
        assert_eq!(summary["budget"], json!(300.0));
        assert_eq!(summary["remaining"], json!(-50.0));
        assert_eq!(summary["percentageUsed"], json!(116.67));
        assert_eq!(summary["categoryBreakdown"]["Food"], json!(150.0));
        assert_eq!(summary["categoryBreakdown"]["Travel"], json!(200.0));
        assert_eq!(summary["expenseCount"], json!(3));
        assert_eq!(summary["band"], "overBudget");

        let ranked = summary["rankedCategories"].as_array().unwrap();
        assert_eq!(ranked[0]["category"], "Travel");
        assert_eq!(ranked[0]["shareOfTotal"], json!(57.14));
        assert_eq!(ranked[1]["category"], "Food");
        assert_eq!(ranked[1]["shareOfTotal"], json!(42.86));
    }

    #[tokio::test]
    async fn summary_of_an_empty_month() {
        let server = test_server();
        let token = sign_up(&server, "foo@bar.baz", 500.0).await;

        let summary = get_summary(&server, &token, 1, 2025).await;

        assert_eq!(summary["totalSpent"], json!(0.0));
        assert_eq!(summary["remaining"], json!(500.0));
        assert_eq!(summary["percentageUsed"], json!(0.0));
        assert_eq!(summary["categoryBreakdown"], json!({}));
        assert_eq!(summary["expenseCount"], json!(0));
        assert_eq!(summary["band"], "normal");
        assert_eq!(summary["rankedCategories"], json!([]));
    }

    #[tokio::test]
    async fn summary_with_zero_budget_reports_zero_percentage() {
        let server = test_server();
        let token = sign_up(&server, "foo@bar.baz", 0.0).await;

        add_expense(
            &server,
            &token,
            json!({ "amount": 80, "category": "Bills", "date": "2025-06-01" }),
        )
        .await;

        let summary = get_summary(&server, &token, 6, 2025).await;

        assert_eq!(summary["percentageUsed"], json!(0.0));
        assert_eq!(summary["remaining"], json!(-80.0));
        assert_eq!(summary["band"], "normal");
    }

    #[tokio::test]
    async fn summary_near_the_budget_is_banded_as_such() {
        let server = test_server();
        let token = sign_up(&server, "foo@bar.baz", 100.0).await;

        add_expense(
            &server,
            &token,
            json!({ "amount": 90, "category": "Food", "date": "2025-06-01" }),
        )
        .await;

        let summary = get_summary(&server, &token, 6, 2025).await;

        assert_eq!(summary["percentageUsed"], json!(90.0));
        assert_eq!(summary["band"], "nearBudget");
    }

    #[tokio::test]
    async fn summary_only_counts_expenses_within_the_month() {
        let server = test_server();
        let token = sign_up(&server, "foo@bar.baz", 100.0).await;

        add_expense(
            &server,
            &token,
            json!({ "amount": 10, "category": "Food", "date": "2025-02-28" }),
        )
        .await;
        add_expense(
            &server,
            &token,
            json!({ "amount": 20, "category": "Food", "date": "2025-03-01" }),
        )
        .await;
        add_expense(
            &server,
            &token,
            json!({ "amount": 30, "category": "Food", "date": "2025-03-31" }),
        )
        .await;
        add_expense(
            &server,
            &token,
            json!({ "amount": 40, "category": "Food", "date": "2025-04-01" }),
        )
        .await;

        let summary = get_summary(&server, &token, 3, 2025).await;

        assert_eq!(summary["totalSpent"], json!(50.0));
        assert_eq!(summary["expenseCount"], json!(2));
    }

    #[tokio::test]
    async fn summary_does_not_include_other_users_expenses() {
        let server = test_server();
        let token = sign_up(&server, "foo@bar.baz", 100.0).await;
        let other_token = sign_up(&server, "other@bar.baz", 100.0).await;

        add_expense(
            &server,
            &other_token,
            json!({ "amount": 99, "category": "Travel", "date": "2025-03-01" }),
        )
        .await;

        let summary = get_summary(&server, &token, 3, 2025).await;

        assert_eq!(summary["totalSpent"], json!(0.0));
        assert_eq!(summary["expenseCount"], json!(0));
    }

    #[tokio::test]
    async fn summary_with_invalid_month_is_rejected() {
        let server = test_server();
        let token = sign_up(&server, "foo@bar.baz", 100.0).await;

        server
            .get(endpoints::EXPENSE_SUMMARY)
            .add_query_param("month", 13)
            .add_query_param("year", 2025)
            .authorization_bearer(token)
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn summary_fails_without_token() {
        let server = test_server();

        server
            .get(endpoints::EXPENSE_SUMMARY)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
