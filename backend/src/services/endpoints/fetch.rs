//! Fan-out over every saved endpoint and the response cache it fills.

use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Handler for `POST /api/endpoints/fetch`.
///
/// Request bodies are validated first and no request is sent if any is
/// invalid. Otherwise all endpoints are queried concurrently; the aggregate
/// replaces the cache and is returned.
pub async fn fetch_all(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let store = state.endpoints.clone();
    let endpoints = web::block(move || store.list()).await??;

    let responses = state
        .remote
        .fetch_all(&endpoints)
        .await
        .map_err(AppError::InvalidEndpoint)?;

    *state.responses.write().await = responses.clone();
    Ok(HttpResponse::Ok().json(responses))
}

/// Handler for `GET /api/endpoints/responses`.
pub async fn responses(state: web::Data<AppState>) -> HttpResponse {
    let responses = state.responses.read().await;
    HttpResponse::Ok().json(&*responses)
}
