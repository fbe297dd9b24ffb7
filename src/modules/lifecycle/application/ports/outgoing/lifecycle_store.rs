use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::lifecycle::application::domain::{
    EntityRecord, Lifecycle, LifecycleEntity, LifecycleState, PageRequest, Stamp,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. Carries the field name.
    #[error("{0} already exists")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Persistence for one lifecycle entity.
///
/// Single-row transitions return `None` when no row matched. `mark_deleted` and
/// `restore` match on id alone, so repeating them is harmless.
#[async_trait]
pub trait LifecycleStore<E: LifecycleEntity>: Send + Sync {
    async fn insert(
        &self,
        meta: Lifecycle,
        attrs: E::Attrs,
    ) -> Result<EntityRecord<E>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<EntityRecord<E>>, StoreError>;

    /// Replaces the attributes of an active row.
    async fn update_active(
        &self,
        id: Uuid,
        attrs: E::Attrs,
        stamp: &Stamp,
    ) -> Result<Option<EntityRecord<E>>, StoreError>;

    async fn mark_deleted(
        &self,
        id: Uuid,
        stamp: &Stamp,
    ) -> Result<Option<EntityRecord<E>>, StoreError>;

    async fn restore(&self, id: Uuid, stamp: &Stamp)
        -> Result<Option<EntityRecord<E>>, StoreError>;

    /// Removes the row whatever its state. `false` when nothing matched.
    async fn purge(&self, id: Uuid) -> Result<bool, StoreError>;

    /// One page of the given partition in insertion order, plus the partition size.
    async fn list(
        &self,
        state: LifecycleState,
        page: &PageRequest,
    ) -> Result<(Vec<EntityRecord<E>>, u64), StoreError>;

    async fn purge_deleted(&self) -> Result<u64, StoreError>;

    async fn restore_deleted(&self, stamp: &Stamp) -> Result<u64, StoreError>;
}
