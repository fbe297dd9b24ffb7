use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::db::map_db_err;
use crate::modules::auth::adapter::outgoing::sea_orm_entity::users;
use crate::modules::catalog::adapter::outgoing::sea_orm_entity::categories;
use crate::modules::lifecycle::application::ports::outgoing::{ReferenceLookup, StoreError};

/// Batched id → name lookups. Deleted rows resolve like active ones.
#[derive(Clone, Debug)]
pub struct ReferenceLookupPostgres {
    db: Arc<DatabaseConnection>,
}

impl ReferenceLookupPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReferenceLookup for ReferenceLookupPostgres {
    async fn usernames(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError> {
        let rows = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .select_only()
            .column(users::Column::Id)
            .column(users::Column::Username)
            .into_tuple::<(Uuid, String)>()
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().collect())
    }

    async fn category_titles(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError> {
        let rows = categories::Entity::find()
            .filter(categories::Column::Id.is_in(ids.iter().copied()))
            .select_only()
            .column(categories::Column::Id)
            .column(categories::Column::Title)
            .into_tuple::<(Uuid, String)>()
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, Value};

    #[tokio::test]
    async fn test_usernames_are_keyed_by_id() {
        let alice = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![btreemap! {
                "id" => Into::<Value>::into(alice),
                "username" => Into::<Value>::into("alice"),
            }]])
            .into_connection();
        let lookup = ReferenceLookupPostgres::new(Arc::new(db));

        let names = lookup.usernames(&[alice, Uuid::new_v4()]).await.unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names.get(&alice).map(String::as_str), Some("alice"));
    }

    #[tokio::test]
    async fn test_category_lookup_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Custom("connection error".into())])
            .into_connection();
        let lookup = ReferenceLookupPostgres::new(Arc::new(db));

        assert!(matches!(
            lookup.category_titles(&[Uuid::new_v4()]).await,
            Err(StoreError::Database(_))
        ));
    }
}
