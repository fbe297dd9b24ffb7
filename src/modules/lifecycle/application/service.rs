use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::application::domain::entities::Identity;
use crate::auth::application::policies::access_policy::AccessPolicy;
use crate::modules::lifecycle::application::domain::{
    EntityRecord, FieldErrors, Lifecycle, LifecycleEntity, LifecycleState, Operation,
    PageRequest, PageResult, RefTarget, Reference, Relations, Stamp,
};
use crate::modules::lifecycle::application::ports::incoming::{
    LifecycleError, LifecycleUseCases,
};
use crate::modules::lifecycle::application::ports::outgoing::{
    resolve_names, LifecycleStore, ReferenceLookup,
};

/// One implementation of the soft-delete lifecycle, instantiated per entity.
///
/// Every operation consults the access policy first, then performs at most one
/// read-modify-write against the store.
pub struct LifecycleService<E, S>
where
    E: LifecycleEntity,
    S: LifecycleStore<E>,
{
    store: S,
    lookup: Arc<dyn ReferenceLookup + Send + Sync>,
    policy: Arc<AccessPolicy>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> LifecycleService<E, S>
where
    E: LifecycleEntity,
    S: LifecycleStore<E>,
{
    pub fn new(
        store: S,
        lookup: Arc<dyn ReferenceLookup + Send + Sync>,
        policy: Arc<AccessPolicy>,
    ) -> Self {
        Self {
            store,
            lookup,
            policy,
            _entity: PhantomData,
        }
    }

    fn authorize(&self, actor: &Identity, op: Operation) -> Result<(), LifecycleError> {
        self.policy.authorize(actor, E::CONFIG.kind, op).map_err(|denied| {
            debug!(actor = %actor.id, reason = %denied, "Access denied");
            LifecycleError::from(denied)
        })
    }

    fn not_found() -> LifecycleError {
        LifecycleError::NotFound(E::CONFIG.label)
    }

    /// References already held in `unchanged` were accepted earlier and are not re-checked.
    async fn check_references(
        &self,
        attrs: &E::Attrs,
        unchanged: &[Reference],
    ) -> Result<(), LifecycleError> {
        let mut errors = FieldErrors::new();

        for reference in E::references(attrs) {
            if unchanged.contains(&reference) {
                continue;
            }
            let ids = [reference.id];
            let found = match reference.target {
                RefTarget::User => self.lookup.usernames(&ids).await?,
                RefTarget::Category => self.lookup.category_titles(&ids).await?,
            };
            if !found.contains_key(&reference.id) {
                errors.add(
                    reference.field,
                    format!("{} does not reference an existing record", reference.field),
                );
            }
        }

        errors.into_result(()).map_err(LifecycleError::Validation)
    }

    async fn view(&self, record: EntityRecord<E>) -> Result<E::View, LifecycleError> {
        let names = resolve_names(self.lookup.as_ref(), &E::relations(&record)).await?;
        Ok(E::project(record, &names))
    }

    async fn views(&self, records: Vec<EntityRecord<E>>) -> Result<Vec<E::View>, LifecycleError> {
        let mut relations = Relations::default();
        for record in &records {
            relations.extend(E::relations(record));
        }
        let names = resolve_names(self.lookup.as_ref(), &relations).await?;

        Ok(records
            .into_iter()
            .map(|record| E::project(record, &names))
            .collect())
    }

    async fn list(
        &self,
        actor: &Identity,
        state: LifecycleState,
        page: PageRequest,
    ) -> Result<PageResult<E::View>, LifecycleError> {
        let op = if state.is_deleted() {
            Operation::ListDeleted
        } else {
            Operation::ListActive
        };
        self.authorize(actor, op)?;

        let (records, total) = self.store.list(state, &page).await?;
        let items = self.views(records).await?;

        Ok(PageResult::new(items, page, total))
    }
}

#[async_trait]
impl<E, S> LifecycleUseCases<E> for LifecycleService<E, S>
where
    E: LifecycleEntity,
    S: LifecycleStore<E>,
{
    async fn create(&self, actor: &Identity, draft: E::Draft) -> Result<E::View, LifecycleError> {
        self.authorize(actor, Operation::Create)?;

        let attrs = E::validate_draft(draft).map_err(LifecycleError::Validation)?;
        self.check_references(&attrs, &[]).await?;

        let meta = Lifecycle::new(Uuid::new_v4(), &Stamp::now(actor.id));
        let record = self.store.insert(meta, attrs).await?;

        info!(
            entity = E::CONFIG.singular,
            id = %record.meta.id,
            actor = %actor.id,
            "Created"
        );
        self.view(record).await
    }

    async fn get(&self, actor: &Identity, id: Uuid) -> Result<E::View, LifecycleError> {
        self.authorize(actor, Operation::Get)?;

        let record = self
            .store
            .find(id)
            .await?
            .filter(|r| E::GET_INCLUDES_DELETED || r.is_active())
            .ok_or_else(Self::not_found)?;

        self.view(record).await
    }

    async fn update(
        &self,
        actor: &Identity,
        id: Uuid,
        patch: E::Patch,
    ) -> Result<E::View, LifecycleError> {
        self.authorize(actor, Operation::Update)?;

        let changes = E::validate_patch(patch).map_err(LifecycleError::Validation)?;
        let mut record = self
            .store
            .find(id)
            .await?
            .filter(|r| r.is_active())
            .ok_or_else(Self::not_found)?;

        let previous = E::references(&record.attrs);
        E::apply(&mut record.attrs, changes);
        self.check_references(&record.attrs, &previous).await?;

        let updated = self
            .store
            .update_active(id, record.attrs, &Stamp::now(actor.id))
            .await?
            .ok_or_else(Self::not_found)?;

        info!(entity = E::CONFIG.singular, id = %id, actor = %actor.id, "Updated");
        self.view(updated).await
    }

    async fn soft_delete(&self, actor: &Identity, id: Uuid) -> Result<E::View, LifecycleError> {
        self.authorize(actor, Operation::SoftDelete)?;

        let record = self
            .store
            .mark_deleted(id, &Stamp::now(actor.id))
            .await?
            .ok_or_else(Self::not_found)?;

        info!(entity = E::CONFIG.singular, id = %id, actor = %actor.id, "Soft deleted");
        self.view(record).await
    }

    async fn restore(&self, actor: &Identity, id: Uuid) -> Result<E::View, LifecycleError> {
        self.authorize(actor, Operation::Restore)?;

        let record = self
            .store
            .restore(id, &Stamp::now(actor.id))
            .await?
            .ok_or_else(Self::not_found)?;

        info!(entity = E::CONFIG.singular, id = %id, actor = %actor.id, "Restored");
        self.view(record).await
    }

    async fn purge(&self, actor: &Identity, id: Uuid) -> Result<(), LifecycleError> {
        self.authorize(actor, Operation::Purge)?;

        if !self.store.purge(id).await? {
            return Err(Self::not_found());
        }

        info!(entity = E::CONFIG.singular, id = %id, actor = %actor.id, "Purged");
        Ok(())
    }

    async fn list_active(
        &self,
        actor: &Identity,
        page: PageRequest,
    ) -> Result<PageResult<E::View>, LifecycleError> {
        self.list(actor, LifecycleState::Active, page).await
    }

    async fn list_deleted(
        &self,
        actor: &Identity,
        page: PageRequest,
    ) -> Result<PageResult<E::View>, LifecycleError> {
        self.list(actor, LifecycleState::Deleted, page).await
    }

    async fn purge_all_deleted(&self, actor: &Identity) -> Result<u64, LifecycleError> {
        self.authorize(actor, Operation::PurgeAllDeleted)?;

        let count = self.store.purge_deleted().await?;
        info!(entity = E::CONFIG.plural, count, actor = %actor.id, "Purged all deleted");
        Ok(count)
    }

    async fn restore_all_deleted(&self, actor: &Identity) -> Result<u64, LifecycleError> {
        self.authorize(actor, Operation::RestoreAllDeleted)?;

        let count = self.store.restore_deleted(&Stamp::now(actor.id)).await?;
        info!(entity = E::CONFIG.plural, count, actor = %actor.id, "Restored all deleted");
        Ok(count)
    }
}
