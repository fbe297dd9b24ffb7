use std::fmt;

use crate::shared::config::ConfigError;

pub const MIN_SECRET_LEN: usize = 32;
pub const MAX_TOKEN_EXPIRY: i64 = 7 * 86_400;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret_key: String,
    pub access_token_expiry: i64, // Expiration in seconds
}

impl JwtConfig {
    /// HS256 wants at least 32 bytes of secret; expiry is capped at a week.
    pub fn new(secret_key: String, access_token_expiry: i64) -> Result<Self, ConfigError> {
        if secret_key.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: format!("must be at least {MIN_SECRET_LEN} characters long"),
            });
        }

        if access_token_expiry <= 0 || access_token_expiry > MAX_TOKEN_EXPIRY {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY",
                reason: format!("must be between 1 and {MAX_TOKEN_EXPIRY} seconds"),
            });
        }

        Ok(Self {
            secret_key,
            access_token_expiry,
        })
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret_key", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish()
    }
}
