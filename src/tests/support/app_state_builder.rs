use actix_web::web;
use std::sync::Arc;

use crate::auth::application::domain::entities::User;
use crate::auth::application::policies::access_policy::AccessPolicy;
use crate::auth::application::ports::outgoing::PasswordHasher;
use crate::auth::application::use_cases::{
    CurrentUserUseCase, ICurrentUserUseCase, ILoginUserUseCase, IRegisterUserUseCase,
    IUpdateUserUseCase, LoginUserUseCase, RegisterUserUseCase, UpdateUserUseCase,
};
use crate::catalog::application::domain::{Category, Product};
use crate::modules::lifecycle::application::ports::incoming::LifecycleUseCases;
use crate::modules::lifecycle::application::ports::outgoing::ReferenceLookup;
use crate::modules::lifecycle::application::service::LifecycleService;
use crate::shared::config::DEFAULT_PAGE_SIZE;
use crate::tests::support::in_memory::{InMemoryDirectory, InMemoryStore};
use crate::tests::support::{fast_hasher, test_token_provider};
use crate::AppState;

/// Wires `AppState` over in-memory stores. The stores are public so tests can
/// seed rows before `build()` and inspect them afterwards.
pub struct TestAppStateBuilder {
    pub users: InMemoryStore<User>,
    pub categories: InMemoryStore<Category>,
    pub products: InMemoryStore<Product>,
    policy: AccessPolicy,
    hasher: Arc<dyn PasswordHasher + Send + Sync>,
    page_size: u64,
    register_user: Option<Arc<dyn IRegisterUserUseCase + Send + Sync>>,
    login_user: Option<Arc<dyn ILoginUserUseCase + Send + Sync>>,
    current_user: Option<Arc<dyn ICurrentUserUseCase + Send + Sync>>,
    update_user: Option<Arc<dyn IUpdateUserUseCase + Send + Sync>>,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            users: InMemoryStore::users(),
            categories: InMemoryStore::categories(),
            products: InMemoryStore::products(),
            policy: AccessPolicy::default(),
            hasher: fast_hasher(),
            page_size: DEFAULT_PAGE_SIZE,
            register_user: None,
            login_user: None,
            current_user: None,
            update_user: None,
        }
    }
}

impl TestAppStateBuilder {
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_register_user(
        mut self,
        uc: impl IRegisterUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.register_user = Some(Arc::new(uc));
        self
    }

    pub fn with_login_user(mut self, uc: impl ILoginUserUseCase + Send + Sync + 'static) -> Self {
        self.login_user = Some(Arc::new(uc));
        self
    }

    pub fn with_current_user(
        mut self,
        uc: impl ICurrentUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.current_user = Some(Arc::new(uc));
        self
    }

    pub fn with_update_user(mut self, uc: impl IUpdateUserUseCase + Send + Sync + 'static) -> Self {
        self.update_user = Some(Arc::new(uc));
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        let directory = InMemoryDirectory::new(self.users.clone(), self.categories.clone());
        let lookup: Arc<dyn ReferenceLookup + Send + Sync> = Arc::new(directory.clone());
        let policy = Arc::new(self.policy);

        let users: Arc<dyn LifecycleUseCases<User> + Send + Sync> = Arc::new(
            LifecycleService::<User, _>::new(self.users.clone(), lookup.clone(), policy.clone()),
        );
        let categories: Arc<dyn LifecycleUseCases<Category> + Send + Sync> =
            Arc::new(LifecycleService::<Category, _>::new(
                self.categories.clone(),
                lookup.clone(),
                policy.clone(),
            ));
        let products: Arc<dyn LifecycleUseCases<Product> + Send + Sync> = Arc::new(
            LifecycleService::<Product, _>::new(self.products.clone(), lookup, policy),
        );

        let register_user_use_case = self.register_user.unwrap_or_else(|| {
            Arc::new(RegisterUserUseCase::new(
                directory.clone(),
                self.users.clone(),
                self.hasher.clone(),
            ))
        });
        let login_user_use_case = self.login_user.unwrap_or_else(|| {
            Arc::new(LoginUserUseCase::new(
                directory.clone(),
                self.hasher.clone(),
                test_token_provider(),
            ))
        });
        let current_user_use_case = self
            .current_user
            .unwrap_or_else(|| Arc::new(CurrentUserUseCase::new(directory.clone())));
        let update_user_use_case = self
            .update_user
            .unwrap_or_else(|| Arc::new(UpdateUserUseCase::new(users.clone(), self.hasher.clone())));

        web::Data::new(AppState {
            users,
            categories,
            products,
            register_user_use_case,
            login_user_use_case,
            current_user_use_case,
            update_user_use_case,
            page_size: self.page_size,
            cookie_secure: false,
        })
    }
}
