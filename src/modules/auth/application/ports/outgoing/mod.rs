pub mod password_hasher;
pub mod token_provider;
pub mod user_query;

pub use password_hasher::{HashError, PasswordHasher};
pub use token_provider::{IssuedToken, TokenError, TokenProvider};
pub use user_query::{UserQuery, UserQueryError};
