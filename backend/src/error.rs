//! Error types shared by the HTTP services and the providers behind them.
//!
//! Every handler returns `Result<_, AppError>`; actix turns the error into a
//! JSON body of the form `{"error": "..."}` (plus `details` for validation
//! lists) with the status code chosen in `status_code`.

use crate::engine::RenderError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Failures of the local persistence layer (session database, endpoint file).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed endpoints file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("endpoint not found: {0}")]
    EndpointNotFound(String),
    #[error("{}", .0.join("; "))]
    InvalidEndpoint(Vec<String>),
}

/// Failures talking to the OAuth or storage provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {service} failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} answered {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("invalid provider URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", .0.join("; "))]
    InvalidEndpoint(Vec<String>),
    #[error("Not signed in")]
    NotSignedIn,
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Missing OAuth configuration")]
    MissingOAuthConfig,
    #[error("{0}")]
    Upstream(String),
    #[error(transparent)]
    Store(StoreError),
    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidEndpoint(errors) => AppError::InvalidEndpoint(errors),
            StoreError::EndpointNotFound(id) => AppError::NotFound(format!("Endpoint {} not found", id)),
            other => AppError::Store(other),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        AppError::Internal(format!("Blocking task failed: {}", err))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [String]>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidEndpoint(_) => StatusCode::BAD_REQUEST,
            AppError::NotSignedIn => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Render(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::MissingOAuthConfig | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        let details = match self {
            AppError::InvalidEndpoint(errors) => Some(errors.as_slice()),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn errors_render_a_fixed_json_shape() {
        let resp = AppError::NotSignedIn.error_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Not signed in" }));
    }

    #[actix_web::test]
    async fn endpoint_validation_lists_every_problem() {
        let err = AppError::InvalidEndpoint(vec!["URL is required".into(), "HTTP method is required".into()]);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["details"].as_array().map(Vec::len), Some(2));
    }
}
