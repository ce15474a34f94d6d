//! # Template Service Module
//!
//! Turns template source into email markup through the render pipeline in
//! [`crate::engine`].
//!
//! ## Sub-modules:
//! - `render`: runs one template and returns `{html, entry_point}`.
//! - `default`: the starter template shown in a fresh editor.
//!
//! Rendering is CPU bound and runs on the blocking pool; a request is never
//! cancelled once it has started.

mod default;
mod render;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for the template routes.
///
/// # Registered Routes:
///
/// *   **`POST /render`**:
///     - **Handler**: `render::process`
///     - **Description**: Renders a `RenderRequest`. `API` is the request's
///       `data` when given, otherwise the cached endpoint responses when
///       `use_endpoint_data` is set, otherwise an empty table. Failures answer
///       `422 {"error": "..."}`.
///
/// *   **`GET /default`**:
///     - **Handler**: `default::process`
///     - **Description**: The starter template as plain text.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/render", post().to(render::process))
        .route("/default", get().to(default::process))
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::engine::DEFAULT_TEMPLATE;
    use crate::services::storage::provider::fake::MemoryDrive;
    use crate::state::AppState;
    use actix_web::{test, web, App};
    use common::model::remote::RemoteResult;
    use common::model::render::RenderOutput;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> AppState {
        AppState::with_providers(Config::for_tests(dir.path()), None, Arc::new(MemoryDrive::default())).unwrap()
    }

    const PRODUCT_CARD: &str = r#"
function ProductCard()
  local name = API.product and API.product.name or "nothing"
  return Html{ Body{ Text("Product: " .. name) } }
end
"#;

    #[actix_web::test]
    async fn renders_the_default_template() {
        let dir = TempDir::new().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(&dir)))
                .service(super::configure_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/templates/default").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(std::str::from_utf8(&body).unwrap(), DEFAULT_TEMPLATE);

        let req = test::TestRequest::post()
            .uri("/api/templates/render")
            .set_json(json!({ "code": DEFAULT_TEMPLATE }))
            .to_request();
        let output: RenderOutput = test::call_and_read_body_json(&app, req).await;
        assert_eq!(output.entry_point, "WelcomeEmail");
        assert!(output.html.starts_with("<!DOCTYPE html"));
    }

    #[actix_web::test]
    async fn empty_code_is_rejected() {
        let dir = TempDir::new().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(&dir)))
                .service(super::configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/templates/render")
            .set_json(json!({ "code": "  \n " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 422);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Please enter some code to generate the email" }));
    }

    #[actix_web::test]
    async fn data_sources_are_chosen_in_order() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        state.responses.write().await.insert(
            "product".to_string(),
            RemoteResult::Success {
                data: json!({ "name": "Lamp" }),
                status: 200,
                status_text: "OK".to_string(),
                headers: BTreeMap::new(),
            },
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(super::configure_routes()),
        )
        .await;

        let render = |body: serde_json::Value| {
            test::TestRequest::post()
                .uri("/api/templates/render")
                .set_json(body)
                .to_request()
        };

        let output: RenderOutput = test::call_and_read_body_json(
            &app,
            render(json!({ "code": PRODUCT_CARD, "use_endpoint_data": true })),
        )
        .await;
        assert!(output.html.contains("Product: Lamp"), "{}", output.html);

        let output: RenderOutput = test::call_and_read_body_json(
            &app,
            render(json!({
                "code": PRODUCT_CARD,
                "use_endpoint_data": true,
                "data": { "product": { "name": "Chair" } }
            })),
        )
        .await;
        assert!(output.html.contains("Product: Chair"));

        let output: RenderOutput =
            test::call_and_read_body_json(&app, render(json!({ "code": PRODUCT_CARD }))).await;
        assert!(output.html.contains("Product: nothing"));
    }

    #[actix_web::test]
    async fn script_errors_are_unprocessable() {
        let dir = TempDir::new().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(&dir)))
                .service(super::configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/templates/render")
            .set_json(json!({ "code": "local x = 1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 422);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("No component found"));
    }
}
