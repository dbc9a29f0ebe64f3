//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}',
//! use [format_endpoint].

/// The route for registering a new user.
pub const SIGN_UP: &str = "/api/auth/signup";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/auth/login";
/// The route for the logged in user's profile.
pub const PROFILE: &str = "/api/auth/profile";
/// The route for updating the logged in user's monthly budget.
pub const BUDGET: &str = "/api/auth/budget";
/// The route to access expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route for the monthly spending summary.
pub const EXPENSE_SUMMARY: &str = "/api/expenses/summary";
/// The route to access a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route for checking that the server is up.
pub const HEALTH: &str = "/api/health";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string wrapped in braces, e.g. '{expense_id}' in the
/// endpoint path '/api/expenses/{expense_id}'. This function assumes the path
/// contains at most one parameter and returns the path unchanged if it has
/// none.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => {
            let mut formatted = endpoint_path[..start].to_string();
            formatted.push_str(&id.to_string());
            formatted.push_str(&endpoint_path[end + 1..]);
            formatted
        }
        _ => endpoint_path.to_string(),
    }
}
