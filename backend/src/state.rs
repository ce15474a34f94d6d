//! Application state shared by every handler.
//!
//! `AppState` is built once in `main.rs` and registered as `web::Data`. Each
//! collaborator (session database, endpoint store, remote-data client,
//! renderer, OAuth and storage providers) is an explicit field, so route tests
//! can assemble the same state around fakes with [`AppState::with_providers`].

use crate::config::Config;
use crate::db::Database;
use crate::engine::RenderEngine;
use crate::error::StoreError;
use crate::services::auth::provider::{GoogleOAuth, OAuthProvider};
use crate::services::endpoints::remote::RemoteDataClient;
use crate::services::endpoints::store::EndpointStore;
use crate::services::storage::provider::{GoogleDrive, StorageProvider};
use crate::services::storage::AppFolderStorage;
use common::model::remote::RemoteResponses;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Timeout for calls to the OAuth and storage providers.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub endpoints: Arc<EndpointStore>,
    pub remote: RemoteDataClient,
    /// Outcome of the last fetch-all, replaced as a whole each time.
    pub responses: Arc<RwLock<RemoteResponses>>,
    pub renderer: RenderEngine,
    /// `None` when the OAuth credentials are not configured.
    pub oauth: Option<Arc<dyn OAuthProvider>>,
    pub storage: Arc<AppFolderStorage>,
}

impl AppState {
    /// Builds the state with the real Google providers.
    pub fn from_config(config: Config) -> Result<Self, StartupError> {
        let http = reqwest::Client::builder().timeout(PROVIDER_TIMEOUT).build()?;
        let oauth = config
            .oauth
            .clone()
            .map(|oauth| Arc::new(GoogleOAuth::new(oauth, http.clone())) as Arc<dyn OAuthProvider>);
        let storage = Arc::new(GoogleDrive::new(http)) as Arc<dyn StorageProvider>;
        Self::with_providers(config, oauth, storage)
    }

    pub fn with_providers(
        config: Config,
        oauth: Option<Arc<dyn OAuthProvider>>,
        storage: Arc<dyn StorageProvider>,
    ) -> Result<Self, StartupError> {
        let db = Database::open(&config.database_path)?;
        let endpoints = EndpointStore::new(config.endpoints_file.clone());
        log::info!(
            "Sessions in {}, endpoints in {}",
            db.path().display(),
            endpoints.path().display()
        );
        Ok(Self {
            db,
            endpoints: Arc::new(endpoints),
            remote: RemoteDataClient::new(config.remote_timeout)?,
            responses: Arc::new(RwLock::new(RemoteResponses::new())),
            renderer: RenderEngine::new(config.render_timeout, config.render_memory_limit),
            oauth,
            storage: Arc::new(AppFolderStorage::new(storage, config.drive_folder_name.clone())),
            config: Arc::new(config),
        })
    }
}
