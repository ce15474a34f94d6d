use crate::error::AppError;
use crate::services::auth::authorize;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::storage::DownloadedFile;
use common::requests::DownloadQuery;

/// Handler for `GET /api/storage/download?fileId=...`.
pub async fn process(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<DownloadQuery>,
) -> Result<HttpResponse, AppError> {
    let session = authorize(&state, &req).await?;
    let file_id = query
        .into_inner()
        .file_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation("fileId is required".to_string()))?;

    let content = state.storage.download(&session.access_token, &file_id).await?;
    Ok(HttpResponse::Ok().json(DownloadedFile { content, success: true }))
}
