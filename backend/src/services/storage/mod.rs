//! # Storage Service Module
//!
//! Saves and loads templates in the signed-in user's cloud storage, scoped to
//! a single application folder.
//!
//! [`AppFolderStorage`] sits between the routes and the [`provider`]: it
//! resolves the folder by name (creating it on first use), remembers its id
//! per user, filters listings to template files and turns uploads into
//! upserts by file name.
//!
//! ## Routes
//!
//! * `GET  /api/storage/files`: files in the app folder.
//! * `GET  /api/storage/download?fileId=...`: content of one file.
//! * `POST /api/storage/upload`: `{content, filename, type}`, where `type` is
//!   `lua` or `html`.
//!
//! All routes answer `401 {"error": "Not signed in"}` without a session
//! cookie, before any provider call is made.

mod download;
mod files;
pub mod provider;
mod upload;

use crate::error::ProviderError;
use actix_web::web::{get, post, scope};
use actix_web::Scope;
use common::model::storage::{FileKind, StoredFile, UploadResult};
use provider::StorageProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const API_PATH: &str = "/api/storage";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/files", get().to(files::process))
        .route("/download", get().to(download::process))
        .route("/upload", post().to(upload::process))
}

pub struct AppFolderStorage {
    provider: Arc<dyn StorageProvider>,
    folder_name: String,
    /// Folder id per user id.
    folders: RwLock<HashMap<String, String>>,
}

impl AppFolderStorage {
    pub fn new(provider: Arc<dyn StorageProvider>, folder_name: String) -> Self {
        Self {
            provider,
            folder_name,
            folders: RwLock::new(HashMap::new()),
        }
    }

    async fn folder_id(&self, user_id: &str, token: &str) -> Result<String, ProviderError> {
        if let Some(id) = self.folders.read().await.get(user_id) {
            return Ok(id.clone());
        }

        let id = match self.provider.find_folder(token, &self.folder_name).await? {
            Some(id) => id,
            None => self.provider.create_folder(token, &self.folder_name).await?,
        };
        self.folders
            .write()
            .await
            .insert(user_id.to_string(), id.clone());
        Ok(id)
    }

    /// Template files in the app folder.
    pub async fn list(&self, user_id: &str, token: &str) -> Result<Vec<StoredFile>, ProviderError> {
        let folder = self.folder_id(user_id, token).await?;
        let files = self.provider.list_files(token, &folder).await?;
        Ok(files.into_iter().filter(StoredFile::is_listed).collect())
    }

    pub async fn download(&self, token: &str, file_id: &str) -> Result<String, ProviderError> {
        self.provider.download(token, file_id).await
    }

    /// Writes `content` under `file_name`, replacing the file if one with that
    /// name already exists in the folder.
    pub async fn upload(
        &self,
        user_id: &str,
        token: &str,
        file_name: &str,
        kind: FileKind,
        content: &str,
    ) -> Result<UploadResult, ProviderError> {
        let folder = self.folder_id(user_id, token).await?;
        let name = kind.file_name(file_name);
        match self.provider.find_file(token, &folder, &name).await? {
            Some(existing) => {
                log::info!("Replacing {} ({})", name, existing.id);
                self.provider
                    .update_file(token, &existing.id, kind.mime_type(), content)
                    .await
            }
            None => {
                log::info!("Creating {}", name);
                self.provider
                    .create_file(token, &folder, &name, kind.mime_type(), content)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::provider::fake::MemoryDrive;
    use super::*;
    use crate::config::Config;
    use crate::db::sessions::SessionRecord;
    use crate::services::auth::session_cookie;
    use crate::state::AppState;
    use actix_web::{test, web, App};
    use serde_json::json;
    use tempfile::TempDir;

    fn storage(drive: &Arc<MemoryDrive>) -> AppFolderStorage {
        AppFolderStorage::new(drive.clone(), "Email Generator Templates".to_string())
    }

    #[actix_web::test]
    async fn upload_is_an_upsert_by_name() {
        let drive = Arc::new(MemoryDrive::default());
        let storage = storage(&drive);

        storage.upload("u1", "t", "welcome", FileKind::Lua, "v1").await.unwrap();
        let before = storage.list("u1", "t").await.unwrap().len();

        let replaced = storage.upload("u1", "t", "welcome.lua", FileKind::Lua, "v2").await.unwrap();
        assert_eq!(storage.list("u1", "t").await.unwrap().len(), before);
        let copies = drive.files_named("welcome.lua");
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].content, "v2");
        assert_eq!(copies[0].id, replaced.file_id);

        storage.upload("u1", "t", "welcome", FileKind::Html, "<p/>").await.unwrap();
        assert_eq!(storage.list("u1", "t").await.unwrap().len(), before + 1);
    }

    #[actix_web::test]
    async fn folder_is_created_once_and_cached() {
        let drive = Arc::new(MemoryDrive::default());
        let storage = storage(&drive);
        storage.list("u1", "t").await.unwrap();
        storage.list("u1", "t").await.unwrap();
        assert_eq!(drive.folders.lock().unwrap().len(), 1);
        assert_eq!(*drive.folder_lookups.lock().unwrap(), 1);

        // a second instance finds the existing folder instead of creating one
        let other = super::AppFolderStorage::new(drive.clone(), "Email Generator Templates".to_string());
        other.list("u1", "t").await.unwrap();
        assert_eq!(drive.folders.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn listing_hides_other_files() {
        let drive = Arc::new(MemoryDrive::default());
        let storage = storage(&drive);
        let folder = storage.folder_id("u1", "t").await.unwrap();
        drive.create_file("t", &folder, "photo.png", "image/png", "").await.unwrap();
        drive.create_file("t", &folder, "notes.txt", "text/plain", "").await.unwrap();
        let names: Vec<String> = storage.list("u1", "t").await.unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["notes.txt"]);
    }

    fn signed_in_state(dir: &TempDir, drive: Arc<MemoryDrive>) -> AppState {
        let state = AppState::with_providers(Config::for_tests(dir.path()), None, drive).unwrap();
        state
            .db
            .save_session(&SessionRecord {
                user_id: "user-1".to_string(),
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
                picture: None,
                access_token: "token".to_string(),
                refresh_token: None,
                expires_at: None,
                created_at: 0,
                updated_at: 0,
            })
            .unwrap();
        state
    }

    #[actix_web::test]
    async fn routes_require_a_session() {
        let dir = TempDir::new().unwrap();
        let drive = Arc::new(MemoryDrive::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(signed_in_state(&dir, drive.clone())))
                .service(configure_routes()),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/storage/files").to_request()).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Not signed in" }));
        assert_eq!(*drive.folder_lookups.lock().unwrap(), 0);
    }

    #[actix_web::test]
    async fn upload_list_download_over_http() {
        let dir = TempDir::new().unwrap();
        let drive = Arc::new(MemoryDrive::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(signed_in_state(&dir, drive.clone())))
                .service(configure_routes()),
        )
        .await;
        let cookie = session_cookie("user-1", false);

        let req = test::TestRequest::post()
            .uri("/api/storage/upload")
            .cookie(cookie.clone())
            .set_json(json!({ "content": "function Email() end", "filename": "promo", "type": "lua" }))
            .to_request();
        let uploaded: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(uploaded["success"], true);
        assert_eq!(uploaded["fileName"], "promo.lua");
        let file_id = uploaded["fileId"].as_str().unwrap().to_string();
        assert_eq!(drive.files_named("promo.lua")[0].mime_type, "text/x-lua");

        let req = test::TestRequest::get()
            .uri("/api/storage/files")
            .cookie(cookie.clone())
            .to_request();
        let listing: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listing["files"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri(&format!("/api/storage/download?fileId={}", file_id))
            .cookie(cookie.clone())
            .to_request();
        let downloaded: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(downloaded["content"], "function Email() end");

        let req = test::TestRequest::get()
            .uri("/api/storage/download")
            .cookie(cookie.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        let req = test::TestRequest::post()
            .uri("/api/storage/upload")
            .cookie(cookie.clone())
            .set_json(json!({ "content": "x", "filename": "run", "type": "exe" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }
}
