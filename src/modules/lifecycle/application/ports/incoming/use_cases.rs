use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::auth::application::domain::entities::Identity;
use crate::modules::auth::application::policies::access_policy::AccessDenied;
use crate::modules::lifecycle::application::domain::{
    FieldErrors, LifecycleEntity, PageRequest, PageResult,
};
use crate::modules::lifecycle::application::ports::outgoing::StoreError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LifecycleError {
    #[error("You are not authorized to perform this action")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(field) => {
                LifecycleError::Conflict(format!("{field} already exists"))
            }
            StoreError::Database(msg) => LifecycleError::Repository(msg),
        }
    }
}

impl From<AccessDenied> for LifecycleError {
    fn from(_: AccessDenied) -> Self {
        LifecycleError::Forbidden
    }
}

/// The soft-delete lifecycle of one entity type. Every call names its actor.
#[async_trait]
pub trait LifecycleUseCases<E: LifecycleEntity>: Send + Sync {
    async fn create(&self, actor: &Identity, draft: E::Draft) -> Result<E::View, LifecycleError>;

    async fn get(&self, actor: &Identity, id: Uuid) -> Result<E::View, LifecycleError>;

    async fn update(
        &self,
        actor: &Identity,
        id: Uuid,
        patch: E::Patch,
    ) -> Result<E::View, LifecycleError>;

    async fn soft_delete(&self, actor: &Identity, id: Uuid) -> Result<E::View, LifecycleError>;

    async fn restore(&self, actor: &Identity, id: Uuid) -> Result<E::View, LifecycleError>;

    async fn purge(&self, actor: &Identity, id: Uuid) -> Result<(), LifecycleError>;

    async fn list_active(
        &self,
        actor: &Identity,
        page: PageRequest,
    ) -> Result<PageResult<E::View>, LifecycleError>;

    async fn list_deleted(
        &self,
        actor: &Identity,
        page: PageRequest,
    ) -> Result<PageResult<E::View>, LifecycleError>;

    async fn purge_all_deleted(&self, actor: &Identity) -> Result<u64, LifecycleError>;

    async fn restore_all_deleted(&self, actor: &Identity) -> Result<u64, LifecycleError>;
}
