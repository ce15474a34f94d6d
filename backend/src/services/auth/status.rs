use super::{removal_cookie, session_key};
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::session::AuthStatus;

/// Handler for `GET /api/auth/provider/status`.
///
/// Answers `{"signedIn": bool, "user": {...} | null}`; the user object never
/// carries tokens. A cookie that matches no session is cleared.
pub async fn process(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let Some(user_id) = session_key(&req) else {
        return Ok(HttpResponse::Ok().json(AuthStatus::signed_out()));
    };

    let db = state.db.clone();
    let record = web::block(move || db.get_session(&user_id)).await??;

    Ok(match record {
        Some(record) => HttpResponse::Ok().json(AuthStatus::signed_in(record.view())),
        None => HttpResponse::Ok()
            .cookie(removal_cookie(state.config.production))
            .json(AuthStatus::signed_out()),
    })
}
