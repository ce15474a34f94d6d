//! # Authentication Service Module
//!
//! Server side of the OAuth sign-in. The browser never sees a token: after the
//! provider redirects back, the callback stores the tokens in the session
//! table and hands the browser an HTTP-only cookie holding only the user id.
//!
//! ## Routes
//!
//! * `GET  /api/auth/provider`: redirect to the provider's consent screen.
//! * `GET  /api/auth/provider/callback`: exchange the code, store the session,
//!   set the cookie and redirect to the app with `?auth=success` or
//!   `?error=<reason>`.
//! * `GET  /api/auth/provider/status`: `{signedIn, user}` for the cookie.
//! * `POST /api/auth/provider/logout`: delete the session, clear the cookie.
//!
//! [`authorize`] is the entry point for other services that need a valid
//! access token for the current request.

mod begin;
mod callback;
mod logout;
pub mod provider;
mod status;

use crate::db::sessions::SessionRecord;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::web::{get, post, scope};
use actix_web::{web, HttpRequest, Scope};

const API_PATH: &str = "/api/auth/provider";

/// Name of the cookie carrying the session lookup key.
pub const SESSION_COOKIE: &str = "user_session";

const SESSION_DAYS: i64 = 30;

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(begin::process))
        .route("/callback", get().to(callback::process))
        .route("/status", get().to(status::process))
        .route("/logout", post().to(logout::process))
}

/// The session key carried by the request, if any.
pub fn session_key(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub fn session_cookie(user_id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, user_id.to_string())
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(Duration::days(SESSION_DAYS))
        .finish()
}

/// A cookie that makes the browser drop the session cookie.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie("", secure);
    cookie.make_removal();
    cookie
}

/// Resolves the session of the request and returns it with a usable access
/// token, refreshing and storing a new one when the old one has expired.
///
/// Fails with `NotSignedIn` when there is no cookie, no matching record, or
/// the token can no longer be refreshed.
pub async fn authorize(state: &AppState, req: &HttpRequest) -> Result<SessionRecord, AppError> {
    let user_id = session_key(req).ok_or(AppError::NotSignedIn)?;
    let db = state.db.clone();
    let mut record = web::block(move || db.get_session(&user_id))
        .await??
        .ok_or(AppError::NotSignedIn)?;

    if !record.needs_refresh() {
        return Ok(record);
    }

    let provider = state.oauth.clone().ok_or(AppError::MissingOAuthConfig)?;
    let refresh_token = record.refresh_token.clone().ok_or(AppError::NotSignedIn)?;
    let tokens = provider.refresh(&refresh_token).await.map_err(|e| {
        log::warn!("Token refresh failed for {}: {}", record.user_id, e);
        AppError::NotSignedIn
    })?;

    let db = state.db.clone();
    let (user_id, access_token, expires_at) = (
        record.user_id.clone(),
        tokens.access_token.clone(),
        tokens.expires_at,
    );
    web::block(move || db.update_access_token(&user_id, &access_token, expires_at)).await??;
    log::info!("Refreshed access token for {}", record.user_id);

    record.access_token = tokens.access_token;
    record.expires_at = tokens.expires_at;
    Ok(record)
}
