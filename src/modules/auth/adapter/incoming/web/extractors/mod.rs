pub mod auth;

pub use auth::{AuthenticatedUser, OptionalSession, SESSION_COOKIE};
