use crate::error::AppError;
use crate::state::AppState;
use actix_web::http::header::LOCATION;
use actix_web::{web, HttpResponse};

/// Handler for `GET /api/auth/provider`.
///
/// Redirects the browser to the provider's consent screen. Without OAuth
/// credentials this answers `500 {"error": "Missing OAuth configuration"}`.
pub async fn process(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let provider = state.oauth.as_ref().ok_or(AppError::MissingOAuthConfig)?;
    let url = provider.authorization_url()?;
    Ok(HttpResponse::Found().insert_header((LOCATION, url)).finish())
}
