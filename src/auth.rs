//! JWT bearer authentication for the API.
//!
//! Protected route handlers take a [Claims] argument, which is extracted from
//! the `Authorization: Bearer` header and verified against the signing key in
//! [AppConfig]. Requests without a valid token are rejected before the
//! handler body runs.

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use email_address::EmailAddress;
use jsonwebtoken::{DecodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppConfig, Error,
    models::{User, UserID},
    stores::UserStore,
};

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: i64,
    /// The email address of the user the token was issued to.
    pub email: String,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
}

impl Claims {
    /// The authenticated user's ID.
    pub fn user_id(&self) -> UserID {
        UserID::new(self.sub)
    }
}

impl<S> FromRequestParts<S> for Claims
where
    AppConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::InvalidCredentials)?;

        let config = AppConfig::from_ref(state);
        let token_data = decode_jwt(bearer.token(), config.decoding_key())?;

        Ok(token_data.claims)
    }
}

/// The email and password a user logs in with.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// The email address entered during log in.
    pub email: String,
    /// The password entered during log in.
    pub password: String,
}

/// Look up the user for `credentials` and check their password.
///
/// # Errors
///
/// Returns an [Error::InvalidCredentials] if the email does not belong to a
/// registered user or the password does not match. The two cases produce the
/// same error so that a client cannot probe for registered email addresses.
pub fn verify_credentials<U>(user_store: &U, credentials: &Credentials) -> Result<User, Error>
where
    U: UserStore,
{
    let email = credentials
        .email
        .trim()
        .parse::<EmailAddress>()
        .map_err(|_| Error::InvalidCredentials)?;

    let user = user_store
        .get_by_email(&email)
        .map_err(|_| Error::InvalidCredentials)?;

    match user.password_hash().verify(&credentials.password) {
        Ok(true) => Ok(user),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => Err(Error::HashingError(error.to_string())),
    }
}

/// Create a signed auth token for `user`.
///
/// # Errors
///
/// Returns an [Error::TokenCreation] if the token could not be signed.
pub fn encode_jwt(user: &User, config: &AppConfig) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user.id().as_i64(),
        email: user.email().to_string(),
        iat: now.unix_timestamp() as usize,
        exp: (now + config.token_lifetime()).unix_timestamp() as usize,
    };

    encode(&Header::default(), &claims, config.encoding_key()).map_err(|error| {
        tracing::error!("could not create an auth token: {error}");
        Error::TokenCreation
    })
}

/// Verify the signature and expiry of `token` and return its claims.
///
/// # Errors
///
/// Returns an [Error::InvalidCredentials] if the token is malformed, was
/// signed with a different key or has expired.
pub fn decode_jwt(token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, Error> {
    decode(token, decoding_key, &Validation::default()).map_err(|_| Error::InvalidCredentials)
}
