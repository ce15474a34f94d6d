use crate::engine::TemplateInputs;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::remote::template_data;
use common::requests::RenderRequest;

/// Handler for `POST /api/templates/render`.
pub async fn process(
    state: web::Data<AppState>,
    request: web::Json<RenderRequest>,
) -> Result<HttpResponse, AppError> {
    let RenderRequest {
        code,
        data,
        assets,
        use_endpoint_data,
    } = request.into_inner();

    let api = match data {
        Some(data) => data,
        None if use_endpoint_data => template_data(&*state.responses.read().await),
        None => Default::default(),
    };
    let inputs = TemplateInputs { api, assets };

    let engine = state.renderer.clone();
    let output = web::block(move || engine.render(&code, &inputs)).await??;
    log::info!(
        "Rendered {} ({} bytes)",
        output.entry_point,
        output.html.len()
    );
    Ok(HttpResponse::Ok().json(output))
}
