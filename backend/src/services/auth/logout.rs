use super::{removal_cookie, session_key};
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

/// Handler for `POST /api/auth/provider/logout`: deletes the session record
/// and clears the cookie. Succeeds when already signed out.
pub async fn process(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    if let Some(user_id) = session_key(&req) {
        let db = state.db.clone();
        let removed = web::block(move || db.delete_session(&user_id)).await??;
        if removed {
            log::info!("Signed out");
        }
    }
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(state.config.production))
        .json(json!({ "success": true })))
}
