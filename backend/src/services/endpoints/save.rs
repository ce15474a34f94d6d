//! Creating and editing descriptors.
//!
//! Both handlers take an `EndpointDraft` and validate it against the saved
//! list (name uniqueness ignores the descriptor being edited). Problems are
//! answered as `400` with every message in `details`.

use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::endpoint::EndpointDraft;

/// Handler for `POST /api/endpoints`.
pub async fn create(
    state: web::Data<AppState>,
    draft: web::Json<EndpointDraft>,
) -> Result<HttpResponse, AppError> {
    let store = state.endpoints.clone();
    let draft = draft.into_inner();
    let created = web::block(move || store.create(draft)).await??;
    log::info!("Added endpoint {} ({} {})", created.name, created.method, created.url);
    Ok(HttpResponse::Created().json(created))
}

/// Handler for `PUT /api/endpoints/{id}`.
///
/// A renamed endpoint loses its cached response, since templates address
/// responses by name.
pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<String>,
    draft: web::Json<EndpointDraft>,
) -> Result<HttpResponse, AppError> {
    let store = state.endpoints.clone();
    let id = id.into_inner();
    let draft = draft.into_inner();
    let (previous, updated) = web::block(move || store.update(&id, draft)).await??;

    if previous.name != updated.name {
        state.responses.write().await.remove(&previous.name);
    }
    Ok(HttpResponse::Ok().json(updated))
}
