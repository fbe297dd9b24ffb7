pub mod app_state_builder;
pub mod in_memory;

use actix_web::{cookie::Cookie, web};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::adapter::incoming::web::extractors::SESSION_COOKIE;
use crate::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::auth::adapter::outgoing::security::BcryptHasher;
use crate::auth::application::domain::entities::{Identity, Role, User, UserAttrs};
use crate::auth::application::policies::points_rank::points_rank;
use crate::auth::application::ports::outgoing::{PasswordHasher, TokenProvider};
use crate::modules::lifecycle::application::domain::{Lifecycle, Stamp};
use crate::modules::lifecycle::application::ports::outgoing::LifecycleStore;

use in_memory::InMemoryStore;

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_only_0123456789";

pub fn load_test_env() {
    dotenvy::from_filename(".env.test").ok();
}

/// Bcrypt at its minimum cost, so tests hash in microseconds.
pub fn fast_hasher() -> Arc<dyn PasswordHasher + Send + Sync> {
    Arc::new(BcryptHasher::new(4))
}

pub fn test_token_provider() -> Arc<dyn TokenProvider + Send + Sync> {
    let config = JwtConfig::new(TEST_JWT_SECRET.to_string(), 3600).expect("valid test jwt config");
    Arc::new(JwtTokenService::new(config))
}

pub fn test_token_data() -> web::Data<Arc<dyn TokenProvider + Send + Sync>> {
    web::Data::new(test_token_provider())
}

pub fn session_cookie_for(identity: &Identity) -> Cookie<'static> {
    let issued = test_token_provider()
        .issue(identity)
        .expect("test token should issue");
    Cookie::new(SESSION_COOKIE, issued.token)
}

/// Stores a user directly, bypassing registration rules. Email is `<username>@example.com`.
pub async fn seed_user(
    users: &InMemoryStore<User>,
    hasher: &dyn PasswordHasher,
    username: &str,
    password: &str,
    role: Role,
) -> Identity {
    let id = Uuid::new_v4();
    let password_hash = hasher
        .hash_password(password)
        .await
        .expect("seed password should hash");

    users
        .insert(
            Lifecycle::new(id, &Stamp::now(id)),
            UserAttrs {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash,
                role,
                points: 0,
                points_rank: points_rank(0).to_string(),
            },
        )
        .await
        .expect("seed user should insert");

    Identity::new(id, role)
}
