use actix_web::{dev::Payload, web, Error as ActixError, FromRequest, HttpRequest, HttpResponse};
use std::{
    future::{ready, Ready},
    sync::Arc,
};

use crate::auth::application::domain::entities::Identity;
use crate::auth::application::ports::outgoing::TokenProvider;
use crate::shared::api::ApiResponse;

/// Name of the HttpOnly cookie carrying the session token.
pub const SESSION_COOKIE: &str = "access_token";

/// A caller whose session cookie verified.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub identity: Identity,
}

/// The caller's identity when a valid session is present, otherwise anonymous.
#[derive(Debug, Clone, Copy)]
pub struct OptionalSession(pub Option<Identity>);

fn create_api_error(response: HttpResponse) -> ActixError {
    actix_web::error::InternalError::from_response("", response).into()
}

fn token_provider(req: &HttpRequest) -> Option<&web::Data<Arc<dyn TokenProvider + Send + Sync>>> {
    req.app_data::<web::Data<Arc<dyn TokenProvider + Send + Sync>>>()
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(tokens) = token_provider(req) else {
            tracing::error!("Token provider missing from app data");
            return ready(Err(create_api_error(ApiResponse::internal_error())));
        };

        let Some(cookie) = req.cookie(SESSION_COOKIE) else {
            return ready(Err(create_api_error(ApiResponse::unauthorized(
                "UNAUTHORIZED",
                "Unauthorized",
            ))));
        };

        match tokens.verify(cookie.value()) {
            Ok(identity) => ready(Ok(AuthenticatedUser { identity })),
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected");
                ready(Err(create_api_error(ApiResponse::forbidden(
                    "FORBIDDEN",
                    "Forbidden",
                ))))
            }
        }
    }
}

impl FromRequest for OptionalSession {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = token_provider(req).and_then(|tokens| {
            let cookie = req.cookie(SESSION_COOKIE)?;
            tokens.verify(cookie.value()).ok()
        });

        ready(Ok(OptionalSession(identity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::entities::Role;
    use crate::tests::support::{session_cookie_for, test_token_data};
    use actix_web::{cookie::Cookie, get, test, App, HttpResponse, Responder};
    use uuid::Uuid;

    #[get("/whoami")]
    async fn whoami(user: AuthenticatedUser) -> impl Responder {
        HttpResponse::Ok().body(user.identity.role.to_string())
    }

    #[get("/maybe")]
    async fn maybe(session: OptionalSession) -> impl Responder {
        HttpResponse::Ok().body(if session.0.is_some() { "user" } else { "anonymous" })
    }

    #[actix_web::test]
    async fn test_missing_cookie_is_unauthorized() {
        let app = test::init_service(App::new().app_data(test_token_data()).service(whoami)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["statusCode"], 401);
    }

    #[actix_web::test]
    async fn test_invalid_token_is_forbidden() {
        let app = test::init_service(App::new().app_data(test_token_data()).service(whoami)).await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .cookie(Cookie::new(SESSION_COOKIE, "not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
    }

    #[actix_web::test]
    async fn test_valid_cookie_yields_identity() {
        let app = test::init_service(App::new().app_data(test_token_data()).service(whoami)).await;
        let identity = Identity::new(Uuid::new_v4(), Role::Seller);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .cookie(session_cookie_for(&identity))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(test::read_body(resp).await, "Seller");
    }

    #[actix_web::test]
    async fn test_missing_token_provider_is_internal_error() {
        let app = test::init_service(App::new().service(whoami)).await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .cookie(Cookie::new(SESSION_COOKIE, "x"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);
    }

    #[actix_web::test]
    async fn test_optional_session_never_rejects() {
        let app = test::init_service(App::new().app_data(test_token_data()).service(maybe)).await;

        let anonymous = test::TestRequest::get()
            .uri("/maybe")
            .cookie(Cookie::new(SESSION_COOKIE, "garbage"))
            .to_request();
        let resp = test::call_service(&app, anonymous).await;
        assert_eq!(test::read_body(resp).await, "anonymous");

        let identity = Identity::new(Uuid::new_v4(), Role::Admin);
        let signed_in = test::TestRequest::get()
            .uri("/maybe")
            .cookie(session_cookie_for(&identity))
            .to_request();
        let resp = test::call_service(&app, signed_in).await;
        assert_eq!(test::read_body(resp).await, "user");
    }
}
