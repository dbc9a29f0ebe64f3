//! Route handlers for signing up, logging in and managing the user profile.

use std::str::FromStr;

use axum::{Json, extract::State, http::StatusCode};
use email_address::EmailAddress;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{Claims, Credentials, encode_jwt, verify_credentials},
    models::{PasswordHash, UserProfile},
    stores::{ExpenseStore, UserStore},
};

/// The data a new user registers with.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpData {
    /// The email address to register with.
    pub email: String,
    /// The password to register with.
    pub password: String,
    /// The user's display name.
    pub name: String,
    /// The initial monthly budget. Defaults to zero when omitted.
    pub monthly_budget: Option<Decimal>,
}

/// The response to a successful sign up or log in.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The bearer token for authenticating subsequent requests.
    pub token: String,
    /// The registered or logged in user.
    pub user: UserProfile,
}

/// A route handler for registering a new user.
///
/// # Errors
///
/// Returns an [Error::Validation] if the email, name or budget is invalid, an
/// [Error::TooWeak] if the password is too short, or an
/// [Error::DuplicateEmail] if the email address is already registered.
pub async fn sign_up<E, U>(
    State(mut state): State<AppState<E, U>>,
    Json(data): Json<SignUpData>,
) -> Result<(StatusCode, Json<AuthResponse>), Error>
where
    E: ExpenseStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let email = EmailAddress::from_str(data.email.trim())
        .map_err(|error| Error::Validation(format!("invalid email address: {error}")))?;

    let name = data.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation("name must not be empty".to_string()));
    }

    let monthly_budget = data.monthly_budget.unwrap_or(Decimal::ZERO);
    if monthly_budget < Decimal::ZERO {
        return Err(Error::Validation(
            "monthly budget must not be negative".to_string(),
        ));
    }

    let password_hash = PasswordHash::from_raw_password(&data.password, PasswordHash::DEFAULT_COST)?;

    let user = state
        .user_store
        .create(email, name, password_hash, monthly_budget)?;
    let token = encode_jwt(&user, &state.config)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserProfile::from(&user),
        }),
    ))
}

/// A route handler for logging in a registered user.
///
/// # Errors
///
/// Returns an [Error::InvalidCredentials] if the email or password is wrong.
/// The client is not told which one was at fault.
pub async fn log_in<E, U>(
    State(state): State<AppState<E, U>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = verify_credentials(&state.user_store, &credentials)?;
    let token = encode_jwt(&user, &state.config)?;

    Ok(Json(AuthResponse {
        token,
        user: UserProfile::from(&user),
    }))
}

/// A route handler for fetching the logged in user's profile.
pub async fn get_profile<E, U>(
    State(state): State<AppState<E, U>>,
    claims: Claims,
) -> Result<Json<UserProfile>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = state.user_store.get(claims.user_id())?;

    Ok(Json(UserProfile::from(&user)))
}

/// The data for updating the monthly budget.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetData {
    /// The new monthly budget.
    pub monthly_budget: Decimal,
}

/// A route handler for replacing the logged in user's monthly budget.
///
/// # Errors
///
/// Returns an [Error::Validation] if the budget is negative.
pub async fn update_budget<E, U>(
    State(mut state): State<AppState<E, U>>,
    claims: Claims,
    Json(data): Json<BudgetData>,
) -> Result<Json<UserProfile>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    if data.monthly_budget < Decimal::ZERO {
        return Err(Error::Validation(
            "monthly budget must not be negative".to_string(),
        ));
    }

    let user = state
        .user_store
        .set_monthly_budget(claims.user_id(), data.monthly_budget)?;

    Ok(Json(UserProfile::from(&user)))
}


#[cfg(test)]
mod log_in_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::routes::{
        endpoints,
        test_utils::{TEST_PASSWORD, sign_up, test_server},
    };

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = test_server();
        sign_up(&server, "foo@bar.baz", 0.0).await;

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        let token = body["token"].as_str().unwrap();

        server
            .get(endpoints::PROFILE)
            .authorization_bearer(token)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = test_server();
        sign_up(&server, "foo@bar.baz", 0.0).await;

        server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "definitelyNotThePassword",
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = test_server();

        server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "nobody@bar.baz",
                "password": TEST_PASSWORD,
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}

#[cfg(test)]
mod profile_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::routes::{
        endpoints,
        test_utils::{sign_up, test_server},
    };

    #[tokio::test]
    async fn get_profile_returns_the_logged_in_user() {
        let server = test_server();
        let token = sign_up(&server, "foo@bar.baz", 250.0).await;

        let response = server
            .get(endpoints::PROFILE)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["email"], "foo@bar.baz");
        assert_eq!(body["monthlyBudget"], json!(250.0));
    }

    #[tokio::test]
    async fn get_profile_fails_without_token() {
        let server = test_server();

        server
            .get(endpoints::PROFILE)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn get_profile_fails_with_invalid_token() {
        let server = test_server();

        server
            .get(endpoints::PROFILE)
            .authorization_bearer("not.a.token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn update_budget_replaces_the_budget() {
        let server = test_server();
        let token = sign_up(&server, "foo@bar.baz", 250.0).await;

        let response = server
            .put(endpoints::BUDGET)
            .authorization_bearer(&token)
            .json(&json!({ "monthlyBudget": 2000.25 }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["monthlyBudget"],
            json!(2000.25)
        );

        let profile = server
            .get(endpoints::PROFILE)
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(profile["monthlyBudget"], json!(2000.25));
    }

    #[tokio::test]
    async fn update_budget_fails_on_negative_budget() {
        let server = test_server();
        let token = sign_up(&server, "foo@bar.baz", 250.0).await;

        server
            .put(endpoints::BUDGET)
            .authorization_bearer(token)
            .json(&json!({ "monthlyBudget": -50 }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
