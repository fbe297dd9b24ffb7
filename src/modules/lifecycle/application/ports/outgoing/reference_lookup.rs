use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use super::lifecycle_store::StoreError;
use crate::modules::lifecycle::application::domain::{Relations, ResolvedNames};

/// Resolves ids to display names across entity tables. Soft-deleted rows still resolve.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    async fn usernames(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError>;

    async fn category_titles(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError>;
}

pub async fn resolve_names(
    lookup: &dyn ReferenceLookup,
    relations: &Relations,
) -> Result<ResolvedNames, StoreError> {
    if relations.is_empty() {
        return Ok(ResolvedNames::default());
    }

    let (usernames, category_titles) = futures::try_join!(
        async {
            if relations.users.is_empty() {
                Ok(HashMap::new())
            } else {
                lookup.usernames(&relations.users).await
            }
        },
        async {
            if relations.categories.is_empty() {
                Ok(HashMap::new())
            } else {
                lookup.category_titles(&relations.categories).await
            }
        },
    )?;

    Ok(ResolvedNames {
        usernames,
        category_titles,
    })
}
