use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::auth::application::domain::entities::{User, UserRecord};
use crate::auth::application::ports::outgoing::{UserQuery, UserQueryError};
use crate::catalog::application::domain::{Category, Product};
use crate::modules::lifecycle::application::domain::{
    EntityRecord, Lifecycle, LifecycleEntity, LifecycleState, PageRequest, Record, Stamp,
};
use crate::modules::lifecycle::application::ports::outgoing::{
    LifecycleStore, ReferenceLookup, StoreError,
};

type UniqueKeys<A> = fn(&A) -> Vec<(&'static str, String)>;

/// Vec-backed store with the same contract as the Postgres adapters.
/// Clones share rows; insertion order is list order.
pub struct InMemoryStore<E: LifecycleEntity> {
    rows: Arc<Mutex<Vec<EntityRecord<E>>>>,
    unique_keys: UniqueKeys<E::Attrs>,
}

impl<E: LifecycleEntity> Clone for InMemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            unique_keys: self.unique_keys,
        }
    }
}

impl InMemoryStore<User> {
    pub fn users() -> Self {
        Self::with_unique_keys(|attrs| {
            vec![
                ("username", attrs.username.clone()),
                ("email", attrs.email.clone()),
            ]
        })
    }
}

impl InMemoryStore<Category> {
    pub fn categories() -> Self {
        Self::with_unique_keys(|attrs| vec![("title", attrs.title.clone())])
    }
}

impl InMemoryStore<Product> {
    pub fn products() -> Self {
        Self::with_unique_keys(|_| Vec::new())
    }
}

impl<E: LifecycleEntity> InMemoryStore<E> {
    fn with_unique_keys(unique_keys: UniqueKeys<E::Attrs>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            unique_keys,
        }
    }

    fn rows(&self) -> MutexGuard<'_, Vec<EntityRecord<E>>> {
        self.rows.lock().expect("in-memory store poisoned")
    }

    pub fn snapshot(&self) -> Vec<EntityRecord<E>> {
        self.rows().clone()
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Flags a row deleted without going through the lifecycle.
    pub fn force_deleted(&self, id: Uuid) {
        if let Some(row) = self.rows().iter_mut().find(|r| r.meta.id == id) {
            row.meta.is_deleted = true;
            row.meta.deleted_date = Some(Utc::now());
        }
    }

    fn check_unique(
        &self,
        rows: &[EntityRecord<E>],
        id: Uuid,
        attrs: &E::Attrs,
    ) -> Result<(), StoreError> {
        for (field, value) in (self.unique_keys)(attrs) {
            let taken = rows
                .iter()
                .filter(|r| r.meta.id != id)
                .any(|r| (self.unique_keys)(&r.attrs).contains(&(field, value.clone())));
            if taken {
                return Err(StoreError::Conflict(field.to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<E: LifecycleEntity> LifecycleStore<E> for InMemoryStore<E> {
    async fn insert(
        &self,
        meta: Lifecycle,
        attrs: E::Attrs,
    ) -> Result<EntityRecord<E>, StoreError> {
        let mut rows = self.rows();
        self.check_unique(&rows, meta.id, &attrs)?;

        let record = Record { meta, attrs };
        rows.push(record.clone());
        Ok(record)
    }

    async fn find(&self, id: Uuid) -> Result<Option<EntityRecord<E>>, StoreError> {
        Ok(self.rows().iter().find(|r| r.meta.id == id).cloned())
    }

    async fn update_active(
        &self,
        id: Uuid,
        attrs: E::Attrs,
        stamp: &Stamp,
    ) -> Result<Option<EntityRecord<E>>, StoreError> {
        let mut rows = self.rows();
        self.check_unique(&rows, id, &attrs)?;

        Ok(rows
            .iter_mut()
            .find(|r| r.meta.id == id && r.is_active())
            .map(|row| {
                row.attrs = attrs;
                row.meta.touch(stamp);
                row.clone()
            }))
    }

    async fn mark_deleted(
        &self,
        id: Uuid,
        stamp: &Stamp,
    ) -> Result<Option<EntityRecord<E>>, StoreError> {
        Ok(self
            .rows()
            .iter_mut()
            .find(|r| r.meta.id == id)
            .map(|row| {
                row.meta.mark_deleted(stamp);
                row.clone()
            }))
    }

    async fn restore(
        &self,
        id: Uuid,
        stamp: &Stamp,
    ) -> Result<Option<EntityRecord<E>>, StoreError> {
        Ok(self
            .rows()
            .iter_mut()
            .find(|r| r.meta.id == id)
            .map(|row| {
                row.meta.restore(stamp);
                row.clone()
            }))
    }

    async fn purge(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|r| r.meta.id != id);
        Ok(rows.len() < before)
    }

    async fn list(
        &self,
        state: LifecycleState,
        page: &PageRequest,
    ) -> Result<(Vec<EntityRecord<E>>, u64), StoreError> {
        let rows = self.rows();
        let partition: Vec<_> = rows.iter().filter(|r| r.meta.state() == state).collect();
        let total = partition.len() as u64;

        let items = partition
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }

    async fn purge_deleted(&self) -> Result<u64, StoreError> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|r| r.is_active());
        Ok((before - rows.len()) as u64)
    }

    async fn restore_deleted(&self, stamp: &Stamp) -> Result<u64, StoreError> {
        let mut count = 0;
        for row in self.rows().iter_mut().filter(|r| !r.is_active()) {
            row.meta.restore(stamp);
            count += 1;
        }
        Ok(count)
    }
}

/// Name lookups and credential queries over the in-memory user and category stores.
#[derive(Clone)]
pub struct InMemoryDirectory {
    users: InMemoryStore<User>,
    categories: InMemoryStore<Category>,
}

impl InMemoryDirectory {
    pub fn new(users: InMemoryStore<User>, categories: InMemoryStore<Category>) -> Self {
        Self { users, categories }
    }
}

#[async_trait]
impl ReferenceLookup for InMemoryDirectory {
    async fn usernames(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError> {
        Ok(self
            .users
            .snapshot()
            .into_iter()
            .filter(|r| ids.contains(&r.meta.id))
            .map(|r| (r.meta.id, r.attrs.username))
            .collect())
    }

    async fn category_titles(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError> {
        Ok(self
            .categories
            .snapshot()
            .into_iter()
            .filter(|r| ids.contains(&r.meta.id))
            .map(|r| (r.meta.id, r.attrs.title))
            .collect())
    }
}

#[async_trait]
impl UserQuery for InMemoryDirectory {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, UserQueryError> {
        Ok(self
            .users
            .snapshot()
            .into_iter()
            .find(|r| r.meta.id == user_id))
    }

    async fn find_active_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, UserQueryError> {
        Ok(self
            .users
            .snapshot()
            .into_iter()
            .find(|r| r.is_active() && r.attrs.username == username))
    }

    async fn exists_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, UserQueryError> {
        Ok(self
            .users
            .snapshot()
            .iter()
            .any(|r| r.attrs.username == username || r.attrs.email == email))
    }
}
