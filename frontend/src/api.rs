//! JSON calls to the mailforge server.
//!
//! Every function returns `Result<_, String>` where the error is the message
//! to show the user: the server's `{"error": "..."}` text when it sent one,
//! otherwise the transport failure.

use common::model::endpoint::{EndpointDescriptor, EndpointDraft};
use common::model::remote::{RemoteResponses, RemoteResult};
use common::model::render::RenderOutput;
use common::model::session::{AuthStatus, SessionState};
use common::model::storage::{DownloadedFile, FileKind, FileListing, StoredFile, UploadResponse};
use common::requests::{RenderRequest, UploadRequest};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Where the browser goes to start the sign-in.
pub const SIGN_IN_URL: &str = "/api/auth/provider";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Vec<String>,
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if response.ok() {
        return response.json::<T>().await.map_err(|e| e.to_string());
    }
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) if body.details.is_empty() => Err(body.error),
        Ok(body) => Err(body.details.join("\n")),
        Err(_) => Err(format!("Request failed with status {}", status)),
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, String> {
    let response = request.send().await.map_err(|e| e.to_string())?;
    read(response).await
}

async fn send_json<B: Serialize, T: DeserializeOwned>(
    request: RequestBuilder,
    body: &B,
) -> Result<T, String> {
    let response = request
        .json(body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read(response).await
}

pub async fn render(request: &RenderRequest) -> Result<RenderOutput, String> {
    send_json(Request::post("/api/templates/render"), request).await
}

pub async fn default_template() -> Result<String, String> {
    let response = Request::get("/api/templates/default")
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("Request failed with status {}", response.status()));
    }
    response.text().await.map_err(|e| e.to_string())
}

pub async fn list_endpoints() -> Result<Vec<EndpointDescriptor>, String> {
    send(Request::get("/api/endpoints")).await
}

pub async fn create_endpoint(draft: &EndpointDraft) -> Result<EndpointDescriptor, String> {
    send_json(Request::post("/api/endpoints"), draft).await
}

pub async fn update_endpoint(id: &str, draft: &EndpointDraft) -> Result<EndpointDescriptor, String> {
    send_json(Request::put(&format!("/api/endpoints/{}", id)), draft).await
}

pub async fn delete_endpoint(id: &str) -> Result<(), String> {
    send::<serde_json::Value>(Request::delete(&format!("/api/endpoints/{}", id)))
        .await
        .map(|_| ())
}

pub async fn test_endpoint(draft: &EndpointDraft) -> Result<RemoteResult, String> {
    send_json(Request::post("/api/endpoints/test"), draft).await
}

pub async fn fetch_all_endpoints() -> Result<RemoteResponses, String> {
    send(Request::post("/api/endpoints/fetch")).await
}

pub async fn cached_responses() -> Result<RemoteResponses, String> {
    send(Request::get("/api/endpoints/responses")).await
}

/// Storage calls guarded by the last known session state.
///
/// The guard only saves a round trip; the server still answers 401 on its
/// own when the cookie is gone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageClient {
    pub session: SessionState,
}

impl StorageClient {
    /// Asks the server who is signed in.
    pub async fn load() -> Result<Self, String> {
        let status: AuthStatus = send(Request::get("/api/auth/provider/status")).await?;
        Ok(Self {
            session: SessionState::from_status(status),
        })
    }

    pub async fn sign_out(&self) -> Result<(), String> {
        send::<serde_json::Value>(Request::post("/api/auth/provider/logout"))
            .await
            .map(|_| ())
    }

    pub async fn list(&self) -> Result<Vec<StoredFile>, String> {
        self.session.require_signed_in().map_err(|e| e.to_string())?;
        let listing: FileListing = send(Request::get("/api/storage/files")).await?;
        Ok(listing.files)
    }

    pub async fn open(&self, file_id: &str) -> Result<String, String> {
        self.session.require_signed_in().map_err(|e| e.to_string())?;
        let file: DownloadedFile =
            send(Request::get("/api/storage/download").query([("fileId", file_id)])).await?;
        Ok(file.content)
    }

    pub async fn save(&self, filename: &str, kind: FileKind, content: &str) -> Result<UploadResponse, String> {
        self.session.require_signed_in().map_err(|e| e.to_string())?;
        let request = UploadRequest {
            content: content.to_string(),
            filename: filename.to_string(),
            file_type: kind.as_str().to_string(),
        };
        send_json(Request::post("/api/storage/upload"), &request).await
    }
}
