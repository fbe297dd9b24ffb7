use std::sync::Arc;

use crate::auth::application::domain::entities::User;
use crate::catalog::application::domain::{Category, Product};
use crate::modules::lifecycle::application::domain::LifecycleEntity;
use crate::modules::lifecycle::application::ports::incoming::LifecycleUseCases;
use crate::AppState;

/// Binds an entity to the use cases registered for it in `AppState`.
pub trait LifecycleResource: LifecycleEntity {
    fn use_cases(state: &AppState) -> &Arc<dyn LifecycleUseCases<Self> + Send + Sync>;
}

impl LifecycleResource for User {
    fn use_cases(state: &AppState) -> &Arc<dyn LifecycleUseCases<Self> + Send + Sync> {
        &state.users
    }
}

impl LifecycleResource for Category {
    fn use_cases(state: &AppState) -> &Arc<dyn LifecycleUseCases<Self> + Send + Sync> {
        &state.categories
    }
}

impl LifecycleResource for Product {
    fn use_cases(state: &AppState) -> &Arc<dyn LifecycleUseCases<Self> + Send + Sync> {
        &state.products
    }
}
