use async_trait::async_trait;

use crate::auth::application::domain::entities::{Identity, UserView};
use crate::auth::application::ports::outgoing::UserQuery;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurrentUserError {
    #[error("User not found")]
    NotFound,
    #[error("Query error: {0}")]
    QueryError(String),
}

#[async_trait]
pub trait ICurrentUserUseCase: Send + Sync {
    async fn execute(&self, identity: &Identity) -> Result<UserView, CurrentUserError>;
}

pub struct CurrentUserUseCase<Q>
where
    Q: UserQuery,
{
    query: Q,
}

impl<Q> CurrentUserUseCase<Q>
where
    Q: UserQuery,
{
    pub fn new(query: Q) -> Self {
        Self { query }
    }
}

#[async_trait]
impl<Q> ICurrentUserUseCase for CurrentUserUseCase<Q>
where
    Q: UserQuery,
{
    async fn execute(&self, identity: &Identity) -> Result<UserView, CurrentUserError> {
        self.query
            .find_by_id(identity.id)
            .await
            .map_err(|e| CurrentUserError::QueryError(e.to_string()))?
            .map(UserView::from)
            .ok_or(CurrentUserError::NotFound)
    }
}
