use actix_web::cookie::{time::Duration, Cookie, SameSite};

use super::extractors::SESSION_COOKIE;
use crate::auth::application::ports::outgoing::IssuedToken;

/// HttpOnly, SameSite=Strict, lives as long as the token. `secure` in production.
pub fn session_cookie(token: &IssuedToken, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.token.clone())
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .secure(secure)
        .max_age(Duration::seconds(token.expires_in))
        .finish()
}

pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .secure(secure)
        .finish();
    cookie.make_removal();
    cookie
}
