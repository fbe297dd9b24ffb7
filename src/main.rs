pub mod api;
pub mod health;
pub mod modules;
pub mod shared;

pub use modules::auth;
pub use modules::catalog;
pub use modules::lifecycle;

use crate::auth::adapter::outgoing::jwt::JwtTokenService;
use crate::auth::adapter::outgoing::security::{Argon2Hasher, BcryptHasher};
use crate::auth::adapter::outgoing::{UserQueryPostgres, UserStorePostgres};
use crate::auth::adapter::incoming::web::routes::update_user_handler;
use crate::auth::application::domain::entities::{Role, User};
use crate::auth::application::policies::access_policy::AccessPolicy;
use crate::auth::application::ports::outgoing::{PasswordHasher, TokenProvider};
use crate::auth::application::use_cases::{
    CurrentUserUseCase, ICurrentUserUseCase, ILoginUserUseCase, IRegisterUserUseCase,
    IUpdateUserUseCase, LoginUserUseCase, RegisterUser, RegisterUserError, RegisterUserUseCase,
    RoleGrant, UpdateUserUseCase,
};
use crate::catalog::adapter::outgoing::{CategoryStorePostgres, ProductStorePostgres};
use crate::catalog::application::domain::{Category, Product};
use crate::lifecycle::adapter::incoming::web::{create_route, lifecycle_scope, update_route};
use crate::lifecycle::adapter::outgoing::ReferenceLookupPostgres;
use crate::lifecycle::application::ports::incoming::LifecycleUseCases;
use crate::lifecycle::application::ports::outgoing::ReferenceLookup;
use crate::lifecycle::application::service::LifecycleService;
use crate::shared::api::{custom_json_config, custom_query_config};
use crate::shared::config::{AppConfig, BootstrapAdmin, HasherKind};

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn LifecycleUseCases<User> + Send + Sync>,
    pub categories: Arc<dyn LifecycleUseCases<Category> + Send + Sync>,
    pub products: Arc<dyn LifecycleUseCases<Product> + Send + Sync>,
    pub register_user_use_case: Arc<dyn IRegisterUserUseCase + Send + Sync>,
    pub login_user_use_case: Arc<dyn ILoginUserUseCase + Send + Sync>,
    pub current_user_use_case: Arc<dyn ICurrentUserUseCase + Send + Sync>,
    pub update_user_use_case: Arc<dyn IUpdateUserUseCase + Send + Sync>,
    pub page_size: u64,
    /// Marks the session cookie `Secure`; on in production only.
    pub cookie_secure: bool,
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    let config = AppConfig::from_env().context("invalid configuration")?;
    let server_url = config.server_url();

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(50)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let db_arc = Arc::new(
        Database::connect(opt)
            .await
            .context("failed to connect to database")?,
    );

    if config.run_migrations {
        Migrator::up(&*db_arc, None)
            .await
            .context("failed to apply migrations")?;
        info!("Migrations applied");
    }

    let policy = Arc::new(match config.access_policy.as_deref() {
        Some(overrides) => {
            AccessPolicy::with_overrides(overrides).context("invalid ACCESS_POLICY")?
        }
        None => AccessPolicy::defaults(),
    });

    let password_hasher: Arc<dyn PasswordHasher + Send + Sync> = match config.password_hasher {
        HasherKind::Bcrypt { cost } => Arc::new(BcryptHasher::new(cost)),
        HasherKind::Argon2 => Arc::new(Argon2Hasher::new()),
    };
    let jwt_service = JwtTokenService::new(config.jwt.clone());
    let token_provider_arc: Arc<dyn TokenProvider + Send + Sync> = Arc::new(jwt_service);

    let user_store = UserStorePostgres::new(Arc::clone(&db_arc));
    let user_query = UserQueryPostgres::new(Arc::clone(&db_arc));
    let lookup: Arc<dyn ReferenceLookup + Send + Sync> =
        Arc::new(ReferenceLookupPostgres::new(Arc::clone(&db_arc)));

    let users: Arc<dyn LifecycleUseCases<User> + Send + Sync> =
        Arc::new(LifecycleService::<User, _>::new(
            user_store.clone(),
            lookup.clone(),
            policy.clone(),
        ));
    let categories: Arc<dyn LifecycleUseCases<Category> + Send + Sync> =
        Arc::new(LifecycleService::<Category, _>::new(
            CategoryStorePostgres::new(Arc::clone(&db_arc)),
            lookup.clone(),
            policy.clone(),
        ));
    let products: Arc<dyn LifecycleUseCases<Product> + Send + Sync> =
        Arc::new(LifecycleService::<Product, _>::new(
            ProductStorePostgres::new(Arc::clone(&db_arc)),
            lookup,
            policy,
        ));

    let register_user_use_case: Arc<dyn IRegisterUserUseCase + Send + Sync> =
        Arc::new(RegisterUserUseCase::new(
            user_query.clone(),
            user_store,
            password_hasher.clone(),
        ));
    let login_user_use_case = LoginUserUseCase::new(
        user_query.clone(),
        password_hasher.clone(),
        token_provider_arc.clone(),
    );
    let current_user_use_case = CurrentUserUseCase::new(user_query);
    let update_user_use_case = UpdateUserUseCase::new(users.clone(), password_hasher);

    if let Some(admin) = config.bootstrap_admin.as_ref() {
        bootstrap_admin(register_user_use_case.as_ref(), admin).await?;
    }

    let state = AppState {
        users,
        categories,
        products,
        register_user_use_case,
        login_user_use_case: Arc::new(login_user_use_case),
        current_user_use_case: Arc::new(current_user_use_case),
        update_user_use_case: Arc::new(update_user_use_case),
        page_size: config.page_size,
        cookie_secure: config.is_production(),
    };

    let client_url = config.client_url.clone();
    let db_for_server = Arc::clone(&db_arc);

    info!(%server_url, environment = %config.environment, "Server listening");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&client_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(Arc::clone(&token_provider_arc)))
            .app_data(web::Data::new(Arc::clone(&db_for_server)))
            .app_data(custom_json_config())
            .app_data(custom_query_config())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
            )
            .configure(init_routes)
    })
    .bind(server_url)?
    .run()
    .await?;

    Ok(())
}

/// Creates the configured administrator unless the username or email is taken.
#[cfg(not(tarpaulin_include))]
async fn bootstrap_admin(
    register: &(dyn IRegisterUserUseCase + Send + Sync),
    admin: &BootstrapAdmin,
) -> anyhow::Result<()> {
    let request = RegisterUser {
        username: Some(admin.username.clone()),
        email: Some(admin.email.clone()),
        password: Some(admin.password.clone()),
        role: Some(Role::Admin),
    };

    match register.execute(request, RoleGrant::Bootstrap).await {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "Bootstrap admin created");
            Ok(())
        }
        Err(RegisterUserError::AlreadyExists) => {
            info!(username = %admin.username, "Bootstrap admin already present");
            Ok(())
        }
        Err(e) => Err(e).context("failed to create bootstrap admin"),
    }
}

pub(crate) fn init_routes(cfg: &mut web::ServiceConfig) {
    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // Auth
    cfg.service(crate::auth::adapter::incoming::web::routes::register_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::login_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::logout_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::current_user_handler);
    // Admin
    cfg.service(crate::lifecycle::adapter::incoming::web::list_entities_handler);
    cfg.service(lifecycle_scope::<User>(None, web::put().to(update_user_handler)));
    cfg.service(lifecycle_scope::<Category>(
        Some(create_route::<Category>()),
        update_route::<Category>(),
    ));
    cfg.service(lifecycle_scope::<Product>(
        Some(create_route::<Product>()),
        update_route::<Product>(),
    ));
}

/// Logs a start-up failure and turns it into a non-zero exit status.
fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Error starting app");
            eprintln!("Error starting app: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    exit_code(start())
}
