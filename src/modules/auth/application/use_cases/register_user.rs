use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::application::domain::entities::{
    normalize_email, normalize_username, Role, User, UserDraft, UserView,
};
use crate::auth::application::policies::password_strength::{check_strength, PasswordRequirements};
use crate::auth::application::ports::outgoing::{PasswordHasher, UserQuery};
use crate::modules::lifecycle::application::domain::{
    FieldErrors, Lifecycle, LifecycleEntity, Stamp,
};
use crate::modules::lifecycle::application::ports::outgoing::{LifecycleStore, StoreError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegisterUserError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Password does not meet requirements")]
    WeakPassword(PasswordRequirements),

    #[error("Username or email already exists")]
    AlreadyExists,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

#[derive(Debug, Clone, Default)]
pub struct RegisterUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Who may pick a role other than Customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGrant {
    SelfService,
    /// An administrator's session; the admin becomes the creator.
    Admin(Uuid),
    /// Start-up provisioning of the initial administrator.
    Bootstrap,
}

#[async_trait]
pub trait IRegisterUserUseCase: Send + Sync {
    async fn execute(
        &self,
        request: RegisterUser,
        grant: RoleGrant,
    ) -> Result<UserView, RegisterUserError>;
}

pub struct RegisterUserUseCase<Q, S>
where
    Q: UserQuery,
    S: LifecycleStore<User>,
{
    query: Q,
    store: S,
    password_hasher: Arc<dyn PasswordHasher + Send + Sync>,
}

impl<Q, S> RegisterUserUseCase<Q, S>
where
    Q: UserQuery,
    S: LifecycleStore<User>,
{
    pub fn new(query: Q, store: S, password_hasher: Arc<dyn PasswordHasher + Send + Sync>) -> Self {
        Self {
            query,
            store,
            password_hasher,
        }
    }
}

#[async_trait]
impl<Q, S> IRegisterUserUseCase for RegisterUserUseCase<Q, S>
where
    Q: UserQuery,
    S: LifecycleStore<User>,
{
    async fn execute(
        &self,
        request: RegisterUser,
        grant: RoleGrant,
    ) -> Result<UserView, RegisterUserError> {
        let mut errors = FieldErrors::new();
        let username = normalize_username(&mut errors, request.username);
        let email = normalize_email(&mut errors, request.email);
        let password = request.password.unwrap_or_default();
        if password.is_empty() {
            errors.add("password", "password is required");
        }

        let role = request.role.unwrap_or_default();
        if role != Role::Customer && grant == RoleGrant::SelfService {
            errors.add("roles", "Only admin can assign roles");
        }
        if !errors.is_empty() {
            return Err(RegisterUserError::Validation(errors));
        }

        let strength = check_strength(&password);
        if !strength.is_valid {
            return Err(RegisterUserError::WeakPassword(strength.requirements));
        }

        let taken = self
            .query
            .exists_by_username_or_email(&username, &email)
            .await
            .map_err(|e| RegisterUserError::RepositoryError(e.to_string()))?;
        if taken {
            return Err(RegisterUserError::AlreadyExists);
        }

        let password_hash = self
            .password_hasher
            .hash_password(&password)
            .await
            .map_err(|e| RegisterUserError::HashingFailed(e.to_string()))?;

        let attrs = User::validate_draft(UserDraft {
            username: Some(username),
            email: Some(email),
            password_hash,
            role,
        })
        .map_err(RegisterUserError::Validation)?;

        let id = Uuid::new_v4();
        let creator = match grant {
            RoleGrant::Admin(admin_id) => admin_id,
            RoleGrant::SelfService | RoleGrant::Bootstrap => id,
        };

        let record = self
            .store
            .insert(Lifecycle::new(id, &Stamp::now(creator)), attrs)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => RegisterUserError::AlreadyExists,
                StoreError::Database(msg) => RegisterUserError::RepositoryError(msg),
            })?;

        info!(user_id = %record.meta.id, role = %record.attrs.role, "User registered");
        Ok(UserView::from(record))
    }
}
