use async_trait::async_trait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    prelude::DateTimeWithTimeZone, sea_query::Expr, ActiveModelTrait, ColumnTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::catalog::application::domain::{Product, ProductAttrs, ProductRecord};
use crate::modules::lifecycle::adapter::outgoing::db::{map_db_err, to_utc};
use crate::modules::lifecycle::application::domain::{
    Lifecycle, LifecycleState, PageRequest, Record, Stamp,
};
use crate::modules::lifecycle::application::ports::outgoing::{LifecycleStore, StoreError};

use super::sea_orm_entity::products::{ActiveModel, Column, Entity, Model};

#[derive(Clone, Debug)]
pub struct ProductStorePostgres {
    db: Arc<DatabaseConnection>,
}

impl ProductStorePostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_json(images: &[String]) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(images).map_err(|e| StoreError::Database(e.to_string()))
}

fn model_to_record(model: Model) -> Result<ProductRecord, StoreError> {
    let images: Vec<String> = serde_json::from_value(model.images)
        .map_err(|e| StoreError::Database(format!("images column: {e}")))?;

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
        attrs: ProductAttrs {
            title: model.title,
            description: model.description,
            images,
            price: model.price,
            loyalty_points: model.loyalty_points,
            product_quantity: model.product_quantity,
            category_id: model.category_id,
        },
    })
}

fn first_record(models: Vec<Model>) -> Result<Option<ProductRecord>, StoreError> {
    models.into_iter().next().map(model_to_record).transpose()
}

#[async_trait]
impl LifecycleStore<Product> for ProductStorePostgres {
    async fn insert(&self, meta: Lifecycle, attrs: ProductAttrs) -> Result<ProductRecord, StoreError> {
        let model = ActiveModel {
            id: Set(meta.id),
            title: Set(attrs.title),
            description: Set(attrs.description),
            images: Set(to_json(&attrs.images)?),
            price: Set(attrs.price),
            loyalty_points: Set(attrs.loyalty_points),
            product_quantity: Set(attrs.product_quantity),
            category_id: Set(attrs.category_id),
            is_deleted: Set(meta.is_deleted),
            created_by: Set(meta.created_by),
            modified_by: Set(meta.modified_by),
            created_date: Set(meta.created_date.fixed_offset()),
            modified_date: Set(meta.modified_date.fixed_offset()),
            deleted_date: Set(meta.deleted_date.map(|d| d.fixed_offset())),
        };

        let inserted = model.insert(&*self.db).await.map_err(map_db_err)?;
        model_to_record(inserted)
    }

    async fn find(&self, id: Uuid) -> Result<Option<ProductRecord>, StoreError> {
        Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .map(model_to_record)
            .transpose()
    }

    async fn update_active(
        &self,
        id: Uuid,
        attrs: ProductAttrs,
        stamp: &Stamp,
    ) -> Result<Option<ProductRecord>, StoreError> {
        let model = ActiveModel {
            id: NotSet,
            title: Set(attrs.title),
            description: Set(attrs.description),
            images: Set(to_json(&attrs.images)?),
            price: Set(attrs.price),
            loyalty_points: Set(attrs.loyalty_points),
            product_quantity: Set(attrs.product_quantity),
            category_id: Set(attrs.category_id),
            is_deleted: NotSet,
            created_by: NotSet,
            modified_by: Set(stamp.actor),
            created_date: NotSet,
            modified_date: Set(stamp.at.fixed_offset()),
            deleted_date: NotSet,
        };

        let results = Entity::update_many()
            .set(model)
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec_with_returning(&*self.db)
            .await
            .map_err(map_db_err)?;

        first_record(results)
    }

    async fn mark_deleted(
        &self,
        id: Uuid,
        stamp: &Stamp,
    ) -> Result<Option<ProductRecord>, StoreError> {
        let results = Entity::update_many()
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

    async fn restore(&self, id: Uuid, stamp: &Stamp) -> Result<Option<ProductRecord>, StoreError> {
        let results = Entity::update_many()
            .col_expr(Column::IsDeleted, Expr::value(false))
            .col_expr(Column::DeletedDate, Expr::value(None::<DateTimeWithTimeZone>))
            .col_expr(Column::ModifiedBy, Expr::value(stamp.actor))
            .col_expr(Column::ModifiedDate, Expr::value(stamp.at.fixed_offset()))
            .filter(Column::Id.eq(id))
            .exec_with_returning(&*self.db)
            .await
            .map_err(map_db_err)?;

        first_record(results)
    }

    async fn purge(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = Entity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(res.rows_affected > 0)
    }

    async fn list(
        &self,
        state: LifecycleState,
        page: &PageRequest,
    ) -> Result<(Vec<ProductRecord>, u64), StoreError> {
        let query = Entity::find()
            .filter(Column::IsDeleted.eq(state.is_deleted()))
            .order_by_asc(Column::CreatedDate)
            .order_by_asc(Column::Id);

        let total = query.clone().count(&*self.db).await.map_err(map_db_err)?;

        let products = query
            .offset(page.offset())
            .limit(page.per_page)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        let records = products
            .into_iter()
            .map(model_to_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((records, total))
    }

    async fn purge_deleted(&self) -> Result<u64, StoreError> {
        let res = Entity::delete_many()
            .filter(Column::IsDeleted.eq(true))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(res.rows_affected)
    }

    async fn restore_deleted(&self, stamp: &Stamp) -> Result<u64, StoreError> {
        let res = Entity::update_many()
            .col_expr(Column::IsDeleted, Expr::value(false))
            .col_expr(Column::DeletedDate, Expr::value(None::<DateTimeWithTimeZone>))
            .col_expr(Column::ModifiedBy, Expr::value(stamp.actor))
            .col_expr(Column::ModifiedDate, Expr::value(stamp.at.fixed_offset()))
            .filter(Column::IsDeleted.eq(true))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(res.rows_affected)
    }
}
