use crate::error::AppError;
use crate::services::auth::authorize;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::storage::{FileKind, UploadResponse};
use common::requests::UploadRequest;

/// Handler for `POST /api/storage/upload`.
///
/// Saving twice under the same name replaces the first file.
pub async fn process(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<UploadRequest>,
) -> Result<HttpResponse, AppError> {
    let session = authorize(&state, &req).await?;
    let UploadRequest {
        content,
        filename,
        file_type,
    } = body.into_inner();

    if content.is_empty() || filename.trim().is_empty() {
        return Err(AppError::Validation(
            "content and filename are required".to_string(),
        ));
    }
    let kind = FileKind::parse(&file_type).ok_or_else(|| {
        AppError::Validation(format!("Unsupported file type \"{}\"; use lua or html", file_type))
    })?;

    let result = state
        .storage
        .upload(&session.user_id, &session.access_token, &filename, kind, &content)
        .await?;
    Ok(HttpResponse::Ok().json(UploadResponse { result, success: true }))
}
