// application/ports/outgoing/user_query.rs
use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::UserRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Read side for credentials: these lookups see the password hash.
#[async_trait]
pub trait UserQuery: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, UserQueryError>;

    async fn find_active_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, UserQueryError>;

    /// Whether any user, deleted or not, already holds the username or email.
    async fn exists_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, UserQueryError>;
}
