use actix_web::{web, Route, Scope};
use serde::de::DeserializeOwned;

use super::handlers;
use super::resource::LifecycleResource;

/// The update route shared by entities without field-level rules.
pub fn update_route<E>() -> Route
where
    E: LifecycleResource,
    E::Patch: DeserializeOwned,
{
    web::put().to(handlers::update::<E>)
}

pub fn create_route<E>() -> Route
where
    E: LifecycleResource,
    E::Draft: DeserializeOwned,
{
    web::post().to(handlers::create::<E>)
}

/// Mounts the lifecycle routes of `E` under its base path.
///
/// Literal segments are registered before `/{id}` so `deleted`, `delete/all`
/// and `restore/all` are never parsed as ids.
pub fn lifecycle_scope<E: LifecycleResource>(create: Option<Route>, update: Route) -> Scope {
    let collection = web::resource("").route(web::get().to(handlers::list_active::<E>));
    let collection = match create {
        Some(route) => collection.route(route),
        None => collection,
    };

    web::scope(E::CONFIG.base_path)
        .route("/deleted", web::get().to(handlers::list_deleted::<E>))
        .route("/delete/all", web::delete().to(handlers::purge_all_deleted::<E>))
        .route("/restore/all", web::put().to(handlers::restore_all_deleted::<E>))
        .route("/{id}/permanent", web::delete().to(handlers::purge::<E>))
        .route("/{id}/restore", web::put().to(handlers::restore::<E>))
        .service(
            web::resource("/{id}")
                .route(web::get().to(handlers::get::<E>))
                .route(update)
                .route(web::delete().to(handlers::soft_delete::<E>)),
        )
        .service(collection)
}
