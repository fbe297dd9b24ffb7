use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::application::domain::entities::{Identity, Role};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    TokenExpired,

    #[error("Token is not yet valid")]
    TokenNotYetValid,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token encoding error: {0}")]
    EncodingError(String),
}

/// JWT claims carried by the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
}

impl TokenClaims {
    pub fn identity(&self) -> Identity {
        Identity::new(self.sub, self.role)
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

pub trait TokenProvider: Send + Sync {
    fn issue(&self, identity: &Identity) -> Result<IssuedToken, TokenError>;

    fn verify(&self, token: &str) -> Result<Identity, TokenError>;
}
