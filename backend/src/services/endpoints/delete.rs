use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// Handler for `DELETE /api/endpoints/{id}`; also evicts the cached response.
pub async fn process(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let store = state.endpoints.clone();
    let id = id.into_inner();
    let removed = web::block(move || store.delete(&id)).await??;
    state.responses.write().await.remove(&removed.name);
    log::info!("Removed endpoint {}", removed.name);
    Ok(HttpResponse::Ok().json(json!({ "success": true, "removed": removed })))
}

/// Handler for `DELETE /api/endpoints`.
pub async fn clear(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let store = state.endpoints.clone();
    web::block(move || store.clear()).await??;
    state.responses.write().await.clear();
    log::info!("Cleared all endpoints");
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
