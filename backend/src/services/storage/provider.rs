//! Remote file storage behind a trait, with a Google Drive v3 implementation.
//!
//! Every call takes the caller's access token; the provider itself holds no
//! credentials.

use crate::error::ProviderError;
use crate::services::auth::provider::read_json;
use async_trait::async_trait;
use common::model::storage::{StoredFile, UploadResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

#[async_trait]
pub trait StorageProvider: Send + Sync {
    async fn find_folder(&self, token: &str, name: &str) -> Result<Option<String>, ProviderError>;

    async fn create_folder(&self, token: &str, name: &str) -> Result<String, ProviderError>;

    /// Files directly inside `folder_id`, most recently modified first.
    async fn list_files(&self, token: &str, folder_id: &str) -> Result<Vec<StoredFile>, ProviderError>;

    async fn find_file(
        &self,
        token: &str,
        folder_id: &str,
        name: &str,
    ) -> Result<Option<StoredFile>, ProviderError>;

    async fn create_file(
        &self,
        token: &str,
        folder_id: &str,
        name: &str,
        mime_type: &str,
        content: &str,
    ) -> Result<UploadResult, ProviderError>;

    /// Replaces the content of an existing file.
    async fn update_file(
        &self,
        token: &str,
        file_id: &str,
        mime_type: &str,
        content: &str,
    ) -> Result<UploadResult, ProviderError>;

    async fn download(&self, token: &str, file_id: &str) -> Result<String, ProviderError>;
}

#[derive(Deserialize)]
struct FileList<T> {
    files: Vec<T>,
}

#[derive(Deserialize)]
struct FileId {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveUpload {
    id: String,
    name: String,
    #[serde(default)]
    web_view_link: Option<String>,
}

impl From<DriveUpload> for UploadResult {
    fn from(file: DriveUpload) -> Self {
        UploadResult {
            file_id: file.id,
            file_name: file.name,
            web_view_link: file.web_view_link,
        }
    }
}

pub struct GoogleDrive {
    http: Client,
}

impl GoogleDrive {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    async fn query<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        q: &str,
        fields: &str,
    ) -> Result<Vec<T>, ProviderError> {
        let url = Url::parse_with_params(
            FILES_URL,
            &[
                ("q", q),
                ("fields", fields),
                ("spaces", "drive"),
                ("orderBy", "modifiedTime desc"),
            ],
        )?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| ProviderError::Http { service: "Drive", source })?;
        let list: FileList<T> = read_json(response, "Drive").await?;
        Ok(list.files)
    }
}

/// Quotes a value for a Drive search expression.
fn quoted(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[async_trait]
impl StorageProvider for GoogleDrive {
    async fn find_folder(&self, token: &str, name: &str) -> Result<Option<String>, ProviderError> {
        let q = format!(
            "name = {} and mimeType = '{}' and trashed = false",
            quoted(name),
            FOLDER_MIME
        );
        let folders: Vec<FileId> = self.query(token, &q, "files(id)").await?;
        Ok(folders.into_iter().next().map(|f| f.id))
    }

    async fn create_folder(&self, token: &str, name: &str) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(format!("{}?fields=id", FILES_URL))
            .bearer_auth(token)
            .json(&json!({ "name": name, "mimeType": FOLDER_MIME }))
            .send()
            .await
            .map_err(|source| ProviderError::Http { service: "Drive", source })?;
        let folder: FileId = read_json(response, "Drive").await?;
        log::info!("Created storage folder {}", name);
        Ok(folder.id)
    }

    async fn list_files(&self, token: &str, folder_id: &str) -> Result<Vec<StoredFile>, ProviderError> {
        let q = format!("{} in parents and trashed = false", quoted(folder_id));
        self.query(token, &q, "files(id,name,mimeType,modifiedTime,size)")
            .await
    }

    async fn find_file(
        &self,
        token: &str,
        folder_id: &str,
        name: &str,
    ) -> Result<Option<StoredFile>, ProviderError> {
        let q = format!(
            "name = {} and {} in parents and trashed = false",
            quoted(name),
            quoted(folder_id)
        );
        let files: Vec<StoredFile> = self
            .query(token, &q, "files(id,name,mimeType,modifiedTime,size)")
            .await?;
        Ok(files.into_iter().next())
    }

    async fn create_file(
        &self,
        token: &str,
        folder_id: &str,
        name: &str,
        mime_type: &str,
        content: &str,
    ) -> Result<UploadResult, ProviderError> {
        let boundary = format!("mailforge-{}", uuid::Uuid::new_v4().simple());
        let metadata = json!({ "name": name, "parents": [folder_id], "mimeType": mime_type });
        let body = format!(
            "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{meta}\r\n--{b}\r\nContent-Type: {mime}\r\n\r\n{content}\r\n--{b}--",
            b = boundary,
            meta = metadata,
            mime = mime_type,
            content = content
        );
        let response = self
            .http
            .post(format!(
                "{}?uploadType=multipart&fields=id,name,webViewLink",
                UPLOAD_URL
            ))
            .bearer_auth(token)
            .header(CONTENT_TYPE, format!("multipart/related; boundary={}", boundary))
            .body(body)
            .send()
            .await
            .map_err(|source| ProviderError::Http { service: "Drive", source })?;
        let file: DriveUpload = read_json(response, "Drive").await?;
        Ok(file.into())
    }

    async fn update_file(
        &self,
        token: &str,
        file_id: &str,
        mime_type: &str,
        content: &str,
    ) -> Result<UploadResult, ProviderError> {
        let response = self
            .http
            .patch(format!(
                "{}/{}?uploadType=media&fields=id,name,webViewLink",
                UPLOAD_URL, file_id
            ))
            .bearer_auth(token)
            .header(CONTENT_TYPE, mime_type)
            .body(content.to_string())
            .send()
            .await
            .map_err(|source| ProviderError::Http { service: "Drive", source })?;
        let file: DriveUpload = read_json(response, "Drive").await?;
        Ok(file.into())
    }

    async fn download(&self, token: &str, file_id: &str) -> Result<String, ProviderError> {
        let response = self
            .http
            .get(format!("{}/{}?alt=media", FILES_URL, file_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| ProviderError::Http { service: "Drive", source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                service: "Drive",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        response
            .text()
            .await
            .map_err(|source| ProviderError::Http { service: "Drive", source })
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct MemoryFile {
        pub id: String,
        pub folder_id: String,
        pub name: String,
        pub mime_type: String,
        pub content: String,
    }

    /// In-memory storage keyed by folder; counts provider calls.
    #[derive(Debug, Default)]
    pub struct MemoryDrive {
        pub folders: Mutex<Vec<(String, String)>>,
        pub files: Mutex<Vec<MemoryFile>>,
        pub folder_lookups: Mutex<usize>,
    }

    impl MemoryDrive {
        pub fn files_named(&self, name: &str) -> Vec<MemoryFile> {
            self.files
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f.name == name)
                .cloned()
                .collect()
        }
    }

    fn stored(file: &MemoryFile) -> StoredFile {
        StoredFile {
            id: file.id.clone(),
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            modified_time: None,
            size: Some(file.content.len().to_string()),
        }
    }

    fn upload_result(file: &MemoryFile) -> UploadResult {
        UploadResult {
            file_id: file.id.clone(),
            file_name: file.name.clone(),
            web_view_link: None,
        }
    }

    #[async_trait]
    impl StorageProvider for MemoryDrive {
        async fn find_folder(&self, _token: &str, name: &str) -> Result<Option<String>, ProviderError> {
            *self.folder_lookups.lock().unwrap() += 1;
            Ok(self
                .folders
                .lock()
                .unwrap()
                .iter()
                .find(|(_, n)| n == name)
                .map(|(id, _)| id.clone()))
        }

        async fn create_folder(&self, _token: &str, name: &str) -> Result<String, ProviderError> {
            let mut folders = self.folders.lock().unwrap();
            let id = format!("folder-{}", folders.len() + 1);
            folders.push((id.clone(), name.to_string()));
            Ok(id)
        }

        async fn list_files(&self, _token: &str, folder_id: &str) -> Result<Vec<StoredFile>, ProviderError> {
            Ok(self
                .files
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f.folder_id == folder_id)
                .map(stored)
                .collect())
        }

        async fn find_file(
            &self,
            _token: &str,
            folder_id: &str,
            name: &str,
        ) -> Result<Option<StoredFile>, ProviderError> {
            Ok(self
                .files
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.folder_id == folder_id && f.name == name)
                .map(stored))
        }

        async fn create_file(
            &self,
            _token: &str,
            folder_id: &str,
            name: &str,
            mime_type: &str,
            content: &str,
        ) -> Result<UploadResult, ProviderError> {
            let mut files = self.files.lock().unwrap();
            let file = MemoryFile {
                id: format!("file-{}", files.len() + 1),
                folder_id: folder_id.to_string(),
                name: name.to_string(),
                mime_type: mime_type.to_string(),
                content: content.to_string(),
            };
            let result = upload_result(&file);
            files.push(file);
            Ok(result)
        }

        async fn update_file(
            &self,
            _token: &str,
            file_id: &str,
            mime_type: &str,
            content: &str,
        ) -> Result<UploadResult, ProviderError> {
            let mut files = self.files.lock().unwrap();
            let file = files
                .iter_mut()
                .find(|f| f.id == file_id)
                .ok_or_else(|| ProviderError::Other(format!("no file {}", file_id)))?;
            file.mime_type = mime_type.to_string();
            file.content = content.to_string();
            Ok(upload_result(file))
        }

        async fn download(&self, _token: &str, file_id: &str) -> Result<String, ProviderError> {
            self.files
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.id == file_id)
                .map(|f| f.content.clone())
                .ok_or_else(|| ProviderError::Status {
                    service: "Drive",
                    status: 404,
                    body: "File not found".to_string(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_values_are_quoted() {
        assert_eq!(quoted("Email Templates"), "'Email Templates'");
        assert_eq!(quoted("it's"), "'it\\'s'");
    }
}
