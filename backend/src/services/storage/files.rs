use crate::error::AppError;
use crate::services::auth::authorize;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::storage::FileListing;

/// Handler for `GET /api/storage/files`.
pub async fn process(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let session = authorize(&state, &req).await?;
    let files = state
        .storage
        .list(&session.user_id, &session.access_token)
        .await?;
    log::info!("Listed {} stored files for {}", files.len(), session.email);
    Ok(HttpResponse::Ok().json(FileListing { files, success: true }))
}
