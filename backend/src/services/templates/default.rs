use crate::engine::DEFAULT_TEMPLATE;
use actix_web::HttpResponse;

/// Handler for `GET /api/templates/default`.
pub async fn process() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(DEFAULT_TEMPLATE)
}
