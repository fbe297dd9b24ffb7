use actix_web::{web, HttpResponse};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::error;
use utoipa::IntoParams;
use uuid::Uuid;

use super::errors::{lifecycle_error_response, not_found_response};
use super::resource::LifecycleResource;
use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::modules::lifecycle::application::domain::{LifecycleEntity, PageRequest, PageResult};
use crate::shared::api::{keyed, ApiResponse};
use crate::AppState;

/// `?page=&limit=`. Values below 1 are treated as 1.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn to_request(self, default_per_page: u64) -> PageRequest {
        let positive = |v: i64| v.max(1) as u64;
        PageRequest::new(
            self.page.map(positive),
            self.limit.map(positive),
            default_per_page,
        )
    }
}

fn parse_id<E: LifecycleEntity>(raw: &str) -> Result<Uuid, HttpResponse> {
    Uuid::parse_str(raw.trim()).map_err(|_| not_found_response(&E::CONFIG))
}

fn success_message<E: LifecycleEntity>(verb: &str) -> String {
    format!("{} {verb} successfully", E::CONFIG.label)
}

/// `{success, message?, <singular>}`
pub fn entity_response<E: LifecycleEntity>(message: Option<&str>, view: E::View) -> HttpResponse {
    match keyed(E::CONFIG.singular, view) {
        Ok(body) => match message {
            Some(message) => ApiResponse::success_with_message(message, body),
            None => ApiResponse::success(body),
        },
        Err(e) => {
            error!(entity = E::CONFIG.singular, error = %e, "Failed to serialize view");
            ApiResponse::internal_error()
        }
    }
}

fn page_body<E: LifecycleEntity>(
    result: PageResult<E::View>,
) -> Result<Map<String, Value>, serde_json::Error> {
    let total_pages = result.total_pages();
    let mut body = Map::new();
    body.insert("count".into(), Value::from(result.items.len()));
    body.insert("total".into(), Value::from(result.total));
    body.insert("page".into(), Value::from(result.page));
    body.insert("totalPages".into(), Value::from(total_pages));
    body.insert(E::CONFIG.plural.into(), serde_json::to_value(result.items)?);
    Ok(body)
}

fn page_response<E: LifecycleEntity>(result: PageResult<E::View>) -> HttpResponse {
    match page_body::<E>(result) {
        Ok(body) => ApiResponse::success(body),
        Err(e) => {
            error!(entity = E::CONFIG.plural, error = %e, "Failed to serialize page");
            ApiResponse::internal_error()
        }
    }
}

fn count_response(message: &str, count: u64) -> HttpResponse {
    let mut body = Map::new();
    body.insert("count".into(), Value::from(count));
    ApiResponse::success_with_message(message, body)
}

pub async fn create<E>(
    user: AuthenticatedUser,
    body: web::Json<E::Draft>,
    data: web::Data<AppState>,
) -> HttpResponse
where
    E: LifecycleResource,
    E::Draft: DeserializeOwned,
{
    match E::use_cases(&data).create(&user.identity, body.into_inner()).await {
        Ok(view) => match keyed(E::CONFIG.singular, view) {
            Ok(body) => ApiResponse::created(&success_message::<E>("created"), body),
            Err(e) => {
                error!(entity = E::CONFIG.singular, error = %e, "Failed to serialize view");
                ApiResponse::internal_error()
            }
        },
        Err(e) => lifecycle_error_response(&E::CONFIG, e),
    }
}

pub async fn get<E: LifecycleResource>(
    user: AuthenticatedUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let id = match parse_id::<E>(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match E::use_cases(&data).get(&user.identity, id).await {
        Ok(view) => entity_response::<E>(None, view),
        Err(e) => lifecycle_error_response(&E::CONFIG, e),
    }
}

pub async fn update<E>(
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<E::Patch>,
    data: web::Data<AppState>,
) -> HttpResponse
where
    E: LifecycleResource,
    E::Patch: DeserializeOwned,
{
    let id = match parse_id::<E>(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match E::use_cases(&data)
        .update(&user.identity, id, body.into_inner())
        .await
    {
        Ok(view) => entity_response::<E>(Some(&success_message::<E>("updated")), view),
        Err(e) => lifecycle_error_response(&E::CONFIG, e),
    }
}

pub async fn soft_delete<E: LifecycleResource>(
    user: AuthenticatedUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let id = match parse_id::<E>(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match E::use_cases(&data).soft_delete(&user.identity, id).await {
        Ok(view) => entity_response::<E>(Some(&success_message::<E>("deleted")), view),
        Err(e) => lifecycle_error_response(&E::CONFIG, e),
    }
}

pub async fn restore<E: LifecycleResource>(
    user: AuthenticatedUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let id = match parse_id::<E>(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match E::use_cases(&data).restore(&user.identity, id).await {
        Ok(view) => entity_response::<E>(Some(&success_message::<E>("restored")), view),
        Err(e) => lifecycle_error_response(&E::CONFIG, e),
    }
}

pub async fn purge<E: LifecycleResource>(
    user: AuthenticatedUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let id = match parse_id::<E>(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match E::use_cases(&data).purge(&user.identity, id).await {
        Ok(()) => ApiResponse::message(&format!("{} permanently deleted", E::CONFIG.label)),
        Err(e) => lifecycle_error_response(&E::CONFIG, e),
    }
}

pub async fn list_active<E: LifecycleResource>(
    user: AuthenticatedUser,
    query: web::Query<PageQuery>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let page = query.into_inner().to_request(data.page_size);
    match E::use_cases(&data).list_active(&user.identity, page).await {
        Ok(result) => page_response::<E>(result),
        Err(e) => lifecycle_error_response(&E::CONFIG, e),
    }
}

pub async fn list_deleted<E: LifecycleResource>(
    user: AuthenticatedUser,
    query: web::Query<PageQuery>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let page = query.into_inner().to_request(data.page_size);
    match E::use_cases(&data).list_deleted(&user.identity, page).await {
        Ok(result) => page_response::<E>(result),
        Err(e) => lifecycle_error_response(&E::CONFIG, e),
    }
}

pub async fn purge_all_deleted<E: LifecycleResource>(
    user: AuthenticatedUser,
    data: web::Data<AppState>,
) -> HttpResponse {
    match E::use_cases(&data).purge_all_deleted(&user.identity).await {
        Ok(count) => count_response(
            &format!("Permanently deleted {count} {}", E::CONFIG.plural),
            count,
        ),
        Err(e) => lifecycle_error_response(&E::CONFIG, e),
    }
}

pub async fn restore_all_deleted<E: LifecycleResource>(
    user: AuthenticatedUser,
    data: web::Data<AppState>,
) -> HttpResponse {
    match E::use_cases(&data).restore_all_deleted(&user.identity).await {
        Ok(count) => count_response(&format!("Restored {count} {}", E::CONFIG.plural), count),
        Err(e) => lifecycle_error_response(&E::CONFIG, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::entities::{Identity, Role};
    use crate::catalog::application::domain::Category;
    use crate::modules::lifecycle::adapter::incoming::web::scope::{
        create_route, lifecycle_scope, update_route,
    };
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::{fast_hasher, seed_user, session_cookie_for, test_token_data};
    use actix_web::{test, App};

    #[actix_web::test]
    async fn page_query_clamps_to_positive() {
        let query = PageQuery {
            page: Some(-3),
            limit: Some(0),
        };
        let page = query.to_request(10);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);

        let page = PageQuery::default().to_request(10);
        assert_eq!((page.page, page.per_page), (1, 10));
    }

    async fn admin_and_builder() -> (Identity, TestAppStateBuilder) {
        let builder = TestAppStateBuilder::default();
        let admin =
            seed_user(&builder.users, fast_hasher().as_ref(), "admin", "Passw0rd!", Role::Admin).await;
        (admin, builder)
    }

    macro_rules! category_app {
        ($builder:expr) => {
            test::init_service(
                App::new()
                    .app_data($builder.build())
                    .app_data(test_token_data())
                    .service(lifecycle_scope::<Category>(
                        Some(create_route::<Category>()),
                        update_route::<Category>(),
                    )),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_create_then_get_resolves_creator() {
        let (admin, builder) = admin_and_builder().await;
        let app = category_app!(builder);

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .cookie(session_cookie_for(&admin))
            .set_json(serde_json::json!({"title": "Electronics"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Category created successfully");
        let id = body["category"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/api/categories/{id}"))
            .cookie(session_cookie_for(&admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["category"]["title"], "Electronics");
        assert_eq!(body["category"]["createdBy"]["username"], "admin");
    }

    #[actix_web::test]
    async fn test_malformed_id_is_not_found() {
        let (admin, builder) = admin_and_builder().await;
        let app = category_app!(builder);

        let req = test::TestRequest::get()
            .uri("/api/categories/not-a-uuid")
            .cookie(session_cookie_for(&admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "CATEGORY_NOT_FOUND");
    }

    #[actix_web::test]
    async fn test_list_envelope_and_bulk_routes() {
        let (admin, builder) = admin_and_builder().await;
        let app = category_app!(builder);

        for title in ["Books", "Games", "Music"] {
            let req = test::TestRequest::post()
                .uri("/api/categories")
                .cookie(session_cookie_for(&admin))
                .set_json(serde_json::json!({ "title": title }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), 201);
        }

        let req = test::TestRequest::get()
            .uri("/api/categories?page=2&limit=2")
            .cookie(session_cookie_for(&admin))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["page"], 2);
        assert_eq!(body["count"], 1);
        assert_eq!(body["categories"][0]["title"], "Music");

        let req = test::TestRequest::get()
            .uri("/api/categories?limit=10")
            .cookie(session_cookie_for(&admin))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let first = body["categories"][0]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/categories/{first}"))
            .cookie(session_cookie_for(&admin))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Category deleted successfully");
        assert_eq!(body["category"]["isDeleted"], true);

        let req = test::TestRequest::get()
            .uri("/api/categories/deleted")
            .cookie(session_cookie_for(&admin))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["categories"][0]["title"], "Books");

        let req = test::TestRequest::put()
            .uri("/api/categories/restore/all")
            .cookie(session_cookie_for(&admin))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["message"], "Restored 1 categories");

        let req = test::TestRequest::delete()
            .uri("/api/categories/delete/all")
            .cookie(session_cookie_for(&admin))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 0);
    }

    #[actix_web::test]
    async fn test_page_beyond_range_is_empty_not_a_crash() {
        let (admin, builder) = admin_and_builder().await;
        let app = category_app!(builder);

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .cookie(session_cookie_for(&admin))
            .set_json(serde_json::json!({ "title": "Books" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);

        let req = test::TestRequest::get()
            .uri("/api/categories?page=9223372036854775807&limit=100")
            .cookie(session_cookie_for(&admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["count"], 0);
        assert_eq!(body["categories"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_customer_cannot_create_category() {
        let builder = TestAppStateBuilder::default();
        let customer =
            seed_user(&builder.users, fast_hasher().as_ref(), "bob", "Passw0rd!", Role::Customer).await;
        let app = category_app!(builder);

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .cookie(session_cookie_for(&customer))
            .set_json(serde_json::json!({"title": "Toys"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "You are not authorized to perform this action");
    }
}
