pub mod auth;
pub mod endpoints;
pub mod storage;
pub mod templates;
