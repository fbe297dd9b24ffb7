//! Requests through the full route table, as mounted by `init_routes`.

use actix_web::{cookie::Cookie, test, App};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::{json, Value};

use crate::auth::adapter::incoming::web::extractors::SESSION_COOKIE;
use crate::auth::application::domain::entities::Role;
use crate::init_routes;
use crate::tests::support::app_state_builder::TestAppStateBuilder;
use crate::tests::support::{fast_hasher, seed_user, session_cookie_for, test_token_data};

macro_rules! full_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state)
                .app_data(test_token_data())
                .configure(init_routes),
        )
        .await
    };
}

/// Rewrites the role claim without re-signing.
fn forge_role(token: &str, role: &str) -> String {
    let parts: Vec<&str> = token.split('.').collect();
    let mut claims: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
    claims["role"] = json!(role);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    format!("{}.{}.{}", parts[0], payload, parts[2])
}

#[actix_web::test]
async fn customer_cannot_list_users() {
    let builder = TestAppStateBuilder::default();
    let customer =
        seed_user(&builder.users, fast_hasher().as_ref(), "carol", "Passw0rd!", Role::Customer).await;
    let app = full_app!(builder.build());

    let req = test::TestRequest::get()
        .uri("/api/auth/users")
        .cookie(session_cookie_for(&customer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "FORBIDDEN");
}

#[actix_web::test]
async fn forged_role_claim_is_rejected() {
    let builder = TestAppStateBuilder::default();
    let customer =
        seed_user(&builder.users, fast_hasher().as_ref(), "carol", "Passw0rd!", Role::Customer).await;
    let app = full_app!(builder.build());

    let genuine = session_cookie_for(&customer);
    let forged = Cookie::new(SESSION_COOKIE, forge_role(genuine.value(), "Admin"));

    let req = test::TestRequest::get()
        .uri("/api/auth/users")
        .cookie(forged)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn admin_builds_catalog_after_login() {
    let builder = TestAppStateBuilder::default();
    seed_user(&builder.users, fast_hasher().as_ref(), "root", "Passw0rd!", Role::Admin).await;
    let app = full_app!(builder.build());

    let login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "root", "password": "Passw0rd!" }))
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(resp.status(), 200);
    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("session cookie")
        .into_owned();

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .cookie(session.clone())
        .set_json(json!({ "title": "Electronics" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let category_id = body["category"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/products")
        .cookie(session.clone())
        .set_json(json!({
            "title": "Phone",
            "price": 199.99,
            "productQuantity": 5,
            "images": ["front.png", "back.png"],
            "category": category_id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let product_id = body["product"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/products/{product_id}"))
        .cookie(session.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["product"]["category"]["title"], "Electronics");
    assert_eq!(body["product"]["createdBy"]["username"], "root");
    assert_eq!(body["product"]["images"], json!(["front.png", "back.png"]));

    let req = test::TestRequest::get()
        .uri("/api/auth/current-user")
        .cookie(session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["roles"], "Admin");
}

#[actix_web::test]
async fn seller_may_read_products_but_not_write() {
    let builder = TestAppStateBuilder::default();
    let seller =
        seed_user(&builder.users, fast_hasher().as_ref(), "sam", "Passw0rd!", Role::Seller).await;
    let app = full_app!(builder.build());

    let req = test::TestRequest::post()
        .uri("/api/products")
        .cookie(session_cookie_for(&seller))
        .set_json(json!({ "title": "Phone" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::get()
        .uri(&format!("/api/products/{}", uuid::Uuid::new_v4()))
        .cookie(session_cookie_for(&seller))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "PRODUCT_NOT_FOUND");
}

#[actix_web::test]
async fn soft_deleted_user_cannot_log_in() {
    let builder = TestAppStateBuilder::default();
    let admin =
        seed_user(&builder.users, fast_hasher().as_ref(), "root", "Passw0rd!", Role::Admin).await;
    let victim =
        seed_user(&builder.users, fast_hasher().as_ref(), "dave", "Passw0rd!", Role::Customer).await;
    let app = full_app!(builder.build());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/auth/users/{}", victim.id))
        .cookie(session_cookie_for(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "dave", "password": "Passw0rd!" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn customer_cannot_take_over_admin_account() {
    let builder = TestAppStateBuilder::default();
    let hasher = fast_hasher();
    let admin = seed_user(&builder.users, hasher.as_ref(), "root", "Passw0rd!", Role::Admin).await;
    let customer =
        seed_user(&builder.users, hasher.as_ref(), "carol", "Passw0rd!", Role::Customer).await;
    let app = full_app!(builder.build());

    let req = test::TestRequest::put()
        .uri(&format!("/api/auth/users/{}", admin.id))
        .cookie(session_cookie_for(&customer))
        .set_json(json!({ "password": "Hijack3d!!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let login = |password: &str| {
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "root", "password": password }))
            .to_request()
    };
    assert_ne!(test::call_service(&app, login("Hijack3d!!")).await.status(), 200);
    assert_eq!(test::call_service(&app, login("Passw0rd!")).await.status(), 200);
}
