use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::endpoint::EndpointDraft;

/// Handler for `POST /api/endpoints/test`.
///
/// Queries a draft once so the configuration form can show what the
/// endpoint returns before it is saved. The name is not checked against the
/// saved list and nothing is cached.
pub async fn process(
    state: web::Data<AppState>,
    draft: web::Json<EndpointDraft>,
) -> Result<HttpResponse, AppError> {
    let descriptor = draft
        .into_inner()
        .into_descriptor("draft".to_string(), &[])
        .map_err(AppError::InvalidEndpoint)?;
    let result = state.remote.fetch(&descriptor).await;
    Ok(HttpResponse::Ok().json(result))
}
