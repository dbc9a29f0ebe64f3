//! The application config holding the JWT signing keys and token lifetime.
//!
//! The secret is handed in at process start; nothing in the core reads
//! ambient state.

use jsonwebtoken::{DecodingKey, EncodingKey};
use time::Duration;

#[derive(Clone)]
struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// The state shared by route handlers that sign or verify auth tokens.
#[derive(Clone)]
pub struct AppConfig {
    jwt_keys: JwtKeys,
    token_lifetime: Duration,
}

impl AppConfig {
    /// How long an auth token stays valid after it is issued.
    pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::days(30);

    /// Create the config for the application, deriving the JWT keys from `jwt_secret`.
    pub fn new(jwt_secret: &str) -> AppConfig {
        AppConfig {
            jwt_keys: JwtKeys {
                encoding_key: EncodingKey::from_secret(jwt_secret.as_ref()),
                decoding_key: DecodingKey::from_secret(jwt_secret.as_ref()),
            },
            token_lifetime: Self::DEFAULT_TOKEN_LIFETIME,
        }
    }

    /// Replace the default token lifetime, e.g. to create an expired token in
    /// a test.
    pub fn with_token_lifetime(mut self, token_lifetime: Duration) -> Self {
        self.token_lifetime = token_lifetime;
        self
    }

    /// How long tokens issued with this config stay valid.
    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// The encoding key for JWTs.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.jwt_keys.encoding_key
    }

    /// The decoding key for JWTs.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.jwt_keys.decoding_key
    }
}
