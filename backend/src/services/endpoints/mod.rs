//! # Endpoint Service Module
//!
//! HTTP API for the external data sources a template can read through `API`.
//!
//! Descriptors are kept in the endpoint file (see [`store`]); fetching them
//! goes through the shared [`remote::RemoteDataClient`] and the outcome is
//! cached in `AppState::responses` until the next fetch-all.
//!
//! ## Routes
//!
//! * `GET    /api/endpoints`: list descriptors.
//! * `POST   /api/endpoints`: create one from an `EndpointDraft`.
//! * `DELETE /api/endpoints`: remove every descriptor and the cached responses.
//! * `PUT    /api/endpoints/{id}`: replace a descriptor.
//! * `DELETE /api/endpoints/{id}`: remove a descriptor and its cached response.
//! * `POST   /api/endpoints/test`: query an unsaved draft once, without caching.
//! * `POST   /api/endpoints/fetch`: query every descriptor concurrently.
//! * `GET    /api/endpoints/responses`: the cached outcome of the last fetch.

mod check;
mod delete;
mod fetch;
mod list;
pub mod remote;
mod save;
pub mod store;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/endpoints";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(save::create))
        .route("", delete().to(delete::clear))
        .route("/test", post().to(check::process))
        .route("/fetch", post().to(fetch::fetch_all))
        .route("/responses", get().to(fetch::responses))
        .route("/{id}", put().to(save::update))
        .route("/{id}", delete().to(delete::process))
}
