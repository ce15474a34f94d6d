//! Completion of the OAuth handshake.
//!
//! The provider redirects here with either `code` or `error`. The handler
//! always answers with a redirect back to the app, carrying the outcome in the
//! query string:
//!
//! * `?auth=success`: the session was stored and the cookie set.
//! * `?error=config_missing`: OAuth credentials are not configured.
//! * `?error=auth_failed`: the user declined or the provider reported an error.
//! * `?error=no_code`: the redirect carried no authorization code.
//! * `?error=callback_failed`: the code exchange or profile lookup failed.

use super::provider::OAuthProvider;
use super::session_cookie;
use crate::db::sessions::SessionRecord;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::http::header::LOCATION;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error: Option<String>,
}

/// Handler for `GET /api/auth/provider/callback`.
pub async fn process(state: web::Data<AppState>, query: web::Query<CallbackQuery>) -> HttpResponse {
    let app_url = state.config.app_url.as_str();

    let Some(provider) = state.oauth.as_deref() else {
        return redirect(app_url, "error=config_missing");
    };
    if let Some(error) = &query.error {
        log::warn!("Provider refused the sign-in: {}", error);
        return redirect(app_url, "error=auth_failed");
    }
    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return redirect(app_url, "error=no_code");
    };

    match complete_sign_in(&state, provider, code).await {
        Ok(record) => {
            log::info!("Signed in {}", record.email);
            let mut response = redirect(app_url, "auth=success");
            if let Err(e) = response.add_cookie(&session_cookie(&record.user_id, state.config.production)) {
                log::error!("Could not set the session cookie: {}", e);
                return redirect(app_url, "error=callback_failed");
            }
            response
        }
        Err(e) => {
            log::error!("OAuth callback failed: {}", e);
            redirect(app_url, "error=callback_failed")
        }
    }
}

async fn complete_sign_in(
    state: &AppState,
    provider: &dyn OAuthProvider,
    code: &str,
) -> Result<SessionRecord, AppError> {
    let tokens = provider.exchange_code(code).await?;
    let user = provider.user_info(&tokens.access_token).await?;

    // Providers only hand out a refresh token on the first consent; later
    // sign-ins keep the stored one.
    let db = state.db.clone();
    let email = user.email.clone();
    let previous = web::block(move || db.get_session_by_email(&email))
        .await??
        .filter(|previous| previous.user_id == user.id);

    let now = Utc::now().timestamp_millis();
    let record = SessionRecord {
        name: if user.name.is_empty() { user.email.clone() } else { user.name },
        user_id: user.id,
        email: user.email,
        picture: user.picture,
        access_token: tokens.access_token,
        refresh_token: tokens
            .refresh_token
            .or_else(|| previous.as_ref().and_then(|p| p.refresh_token.clone())),
        expires_at: tokens.expires_at,
        created_at: previous.as_ref().map_or(now, |p| p.created_at),
        updated_at: now,
    };

    let db = state.db.clone();
    let to_save = record.clone();
    web::block(move || db.save_session(&to_save)).await??;
    Ok(record)
}

fn redirect(app_url: &str, outcome: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, format!("{}?{}", app_url, outcome)))
        .finish()
}
