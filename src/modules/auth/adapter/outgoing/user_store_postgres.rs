use async_trait::async_trait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::entities::{Role, User, UserAttrs, UserRecord};
use crate::modules::lifecycle::adapter::outgoing::db::{map_db_err, map_write_err, to_utc};
use crate::modules::lifecycle::application::domain::{
    Lifecycle, LifecycleState, PageRequest, Record, Stamp,
};
use crate::modules::lifecycle::application::ports::outgoing::{LifecycleStore, StoreError};

use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Column, Entity as UserEntity, Model as UserModel,
};

const UNIQUE_FIELDS: &[&str] = &["username", "email"];

#[derive(Clone, Debug)]
pub struct UserStorePostgres {
    db: Arc<DatabaseConnection>,
}

impl UserStorePostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

pub(super) fn model_to_record(model: UserModel) -> Result<UserRecord, StoreError> {
    let role: Role = model.role.parse().map_err(StoreError::Database)?;

    Ok(Record {
        meta: Lifecycle {
            id: model.id,
            is_deleted: model.is_deleted,
            created_by: model.created_by,
            modified_by: model.modified_by,
            created_date: to_utc(model.created_date),
            modified_date: to_utc(model.modified_date),
            deleted_date: model.deleted_date.map(to_utc),
        },
        attrs: UserAttrs {
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            role,
            points: model.points,
            points_rank: model.points_rank,
        },
    })
}

fn first_record(models: Vec<UserModel>) -> Result<Option<UserRecord>, StoreError> {
    models.into_iter().next().map(model_to_record).transpose()
}

#[async_trait]
impl LifecycleStore<User> for UserStorePostgres {
    async fn insert(&self, meta: Lifecycle, attrs: UserAttrs) -> Result<UserRecord, StoreError> {
        let active_user = UserActiveModel {
            id: Set(meta.id),
            username: Set(attrs.username),
            email: Set(attrs.email),
            password_hash: Set(attrs.password_hash),
            role: Set(attrs.role.to_string()),
            points: Set(attrs.points),
            points_rank: Set(attrs.points_rank),
            is_deleted: Set(meta.is_deleted),
            created_by: Set(meta.created_by),
            modified_by: Set(meta.modified_by),
            created_date: Set(meta.created_date.fixed_offset()),
            modified_date: Set(meta.modified_date.fixed_offset()),
            deleted_date: Set(meta.deleted_date.map(|d| d.fixed_offset())),
        };

        let inserted = active_user
            .insert(&*self.db)
            .await
            .map_err(|e| map_write_err(e, UNIQUE_FIELDS))?;

        model_to_record(inserted)
    }

    async fn find(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        UserEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .map(model_to_record)
            .transpose()
    }

    async fn update_active(
        &self,
        id: Uuid,
        attrs: UserAttrs,
        stamp: &Stamp,
    ) -> Result<Option<UserRecord>, StoreError> {
        let model = UserActiveModel {
            id: NotSet,
            username: Set(attrs.username),
            email: Set(attrs.email),
            password_hash: Set(attrs.password_hash),
            role: Set(attrs.role.to_string()),
            points: Set(attrs.points),
            points_rank: Set(attrs.points_rank),
            is_deleted: NotSet,
            created_by: NotSet,
            modified_by: Set(stamp.actor),
            created_date: NotSet,
            modified_date: Set(stamp.at.fixed_offset()),
            deleted_date: NotSet,
        };

        let results = UserEntity::update_many()
            .set(model)
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec_with_returning(&*self.db)
            .await
            .map_err(|e| map_write_err(e, UNIQUE_FIELDS))?;

        first_record(results)
    }

    async fn mark_deleted(
        &self,
        id: Uuid,
        stamp: &Stamp,
    ) -> Result<Option<UserRecord>, StoreError> {
        let results = UserEntity::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::DeletedDate, Expr::value(Some(stamp.at.fixed_offset())))
            .col_expr(Column::ModifiedBy, Expr::value(stamp.actor))
            .col_expr(Column::ModifiedDate, Expr::value(stamp.at.fixed_offset()))
            .filter(Column::Id.eq(id))
            .exec_with_returning(&*self.db)
            .await
            .map_err(map_db_err)?;

        first_record(results)
    }

    async fn restore(&self, id: Uuid, stamp: &Stamp) -> Result<Option<UserRecord>, StoreError> {
        let results = UserEntity::update_many()
            .col_expr(Column::IsDeleted, Expr::value(false))
            .col_expr(Column::DeletedDate, Expr::value(None::<sea_orm::prelude::DateTimeWithTimeZone>))
            .col_expr(Column::ModifiedBy, Expr::value(stamp.actor))
            .col_expr(Column::ModifiedDate, Expr::value(stamp.at.fixed_offset()))
            .filter(Column::Id.eq(id))
            .exec_with_returning(&*self.db)
            .await
            .map_err(map_db_err)?;

        first_record(results)
    }

    async fn purge(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = UserEntity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(res.rows_affected > 0)
    }

    async fn list(
        &self,
        state: LifecycleState,
        page: &PageRequest,
    ) -> Result<(Vec<UserRecord>, u64), StoreError> {
        let query = UserEntity::find()
            .filter(Column::IsDeleted.eq(state.is_deleted()))
            .order_by_asc(Column::CreatedDate)
            .order_by_asc(Column::Id);

        let total = query.clone().count(&*self.db).await.map_err(map_db_err)?;

        let users = query
            .offset(page.offset())
            .limit(page.per_page)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        let records = users
            .into_iter()
            .map(model_to_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((records, total))
    }

    async fn purge_deleted(&self) -> Result<u64, StoreError> {
        let res = UserEntity::delete_many()
            .filter(Column::IsDeleted.eq(true))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(res.rows_affected)
    }

    async fn restore_deleted(&self, stamp: &Stamp) -> Result<u64, StoreError> {
        let res = UserEntity::update_many()
            .col_expr(Column::IsDeleted, Expr::value(false))
            .col_expr(Column::DeletedDate, Expr::value(None::<sea_orm::prelude::DateTimeWithTimeZone>))
            .col_expr(Column::ModifiedBy, Expr::value(stamp.actor))
            .col_expr(Column::ModifiedDate, Expr::value(stamp.at.fixed_offset()))
            .filter(Column::IsDeleted.eq(true))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(res.rows_affected)
    }
}
