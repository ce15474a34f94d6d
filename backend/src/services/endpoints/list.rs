use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Handler for `GET /api/endpoints`.
pub async fn process(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let store = state.endpoints.clone();
    let endpoints = web::block(move || store.list()).await??;
    Ok(HttpResponse::Ok().json(endpoints))
}
