use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::entities::{Identity, Role, User, UserPatch, UserView};
use crate::auth::application::policies::password_strength::{check_strength, PasswordRequirements};
use crate::auth::application::ports::outgoing::PasswordHasher;
use crate::modules::lifecycle::application::domain::FieldErrors;
use crate::modules::lifecycle::application::ports::incoming::{LifecycleError, LifecycleUseCases};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpdateUserError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Password does not meet requirements")]
    WeakPassword(PasswordRequirements),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub points: Option<i64>,
}

#[async_trait]
pub trait IUpdateUserUseCase: Send + Sync {
    async fn execute(
        &self,
        actor: &Identity,
        user_id: Uuid,
        request: UpdateUser,
    ) -> Result<UserView, UpdateUserError>;
}

/// Field-level gate in front of the generic lifecycle update. Non-admins may
/// only edit their own account and never its role or points. A new password is
/// checked and hashed before storage.
pub struct UpdateUserUseCase {
    users: Arc<dyn LifecycleUseCases<User> + Send + Sync>,
    password_hasher: Arc<dyn PasswordHasher + Send + Sync>,
}

impl UpdateUserUseCase {
    pub fn new(
        users: Arc<dyn LifecycleUseCases<User> + Send + Sync>,
        password_hasher: Arc<dyn PasswordHasher + Send + Sync>,
    ) -> Self {
        Self {
            users,
            password_hasher,
        }
    }
}

#[async_trait]
impl IUpdateUserUseCase for UpdateUserUseCase {
    async fn execute(
        &self,
        actor: &Identity,
        user_id: Uuid,
        request: UpdateUser,
    ) -> Result<UserView, UpdateUserError> {
        if !actor.is_admin() {
            if actor.id != user_id {
                return Err(LifecycleError::Forbidden.into());
            }
            let mut errors = FieldErrors::new();
            if request.role.is_some() {
                errors.add("roles", "Only admin can update roles");
            }
            if request.points.is_some() {
                errors.add("points", "Only admin can update points");
            }
            if !errors.is_empty() {
                return Err(LifecycleError::Validation(errors).into());
            }
        }

        let password_hash = match request.password {
            Some(password) => {
                let strength = check_strength(&password);
                if !strength.is_valid {
                    return Err(UpdateUserError::WeakPassword(strength.requirements));
                }
                let hash = self
                    .password_hasher
                    .hash_password(&password)
                    .await
                    .map_err(|e| UpdateUserError::HashingFailed(e.to_string()))?;
                Some(hash)
            }
            None => None,
        };

        let patch = UserPatch {
            username: request.username,
            email: request.email,
            password_hash,
            role: request.role,
            points: request.points,
        };

        Ok(self.users.update(actor, user_id, patch).await?)
    }
}
