//! Runtime configuration read from the process environment.
//!
//! A `.env` file in the working directory is loaded first (see `main.rs`), so
//! local development only needs that file. Every key has a default except the
//! OAuth credentials; without them the auth and storage routes answer with a
//! configuration error instead of failing at startup.

use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("could not determine a data directory; set MAILFORGE_DATABASE and MAILFORGE_ENDPOINTS_FILE")]
    NoDataDir,
}

/// Credentials for the OAuth provider and the storage API behind it.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Public URL of the web client; OAuth callbacks redirect here.
    pub app_url: String,
    pub production: bool,
    pub open_browser: bool,
    pub database_path: PathBuf,
    pub endpoints_file: PathBuf,
    pub oauth: Option<OAuthConfig>,
    pub drive_folder_name: String,
    pub render_timeout: Duration,
    pub render_memory_limit: usize,
    pub remote_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = var("MAILFORGE_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse("MAILFORGE_PORT", "a port number", 8080u16)?;
        let app_url = var("APP_URL").unwrap_or_else(|| format!("http://{}:{}", host, port));

        let (database_path, endpoints_file) =
            match (var("MAILFORGE_DATABASE"), var("MAILFORGE_ENDPOINTS_FILE")) {
                (Some(db), Some(endpoints)) => (PathBuf::from(db), PathBuf::from(endpoints)),
                (db, endpoints) => {
                    let dirs = ProjectDirs::from("com", "mailforge", "mailforge")
                        .ok_or(ConfigError::NoDataDir)?;
                    let data_dir = dirs.data_dir();
                    (
                        db.map(PathBuf::from)
                            .unwrap_or_else(|| data_dir.join("sessions.sqlite")),
                        endpoints
                            .map(PathBuf::from)
                            .unwrap_or_else(|| data_dir.join("endpoints.json")),
                    )
                }
            };

        let oauth = match (
            var("GOOGLE_CLIENT_ID"),
            var("GOOGLE_CLIENT_SECRET"),
            var("GOOGLE_REDIRECT_URI"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(OAuthConfig {
                client_id,
                client_secret,
                redirect_uri,
            }),
            _ => None,
        };

        Ok(Self {
            app_url,
            production: var("MAILFORGE_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production")),
            open_browser: parse("MAILFORGE_OPEN_BROWSER", "true or false", true)?,
            database_path,
            endpoints_file,
            oauth,
            drive_folder_name: var("DRIVE_FOLDER_NAME")
                .unwrap_or_else(|| "Email Generator Templates".to_string()),
            render_timeout: Duration::from_millis(parse(
                "RENDER_TIMEOUT_MS",
                "a number of milliseconds",
                2_000u64,
            )?),
            render_memory_limit: parse("RENDER_MEMORY_LIMIT", "a number of bytes", 8 * 1024 * 1024usize)?,
            remote_timeout: Duration::from_millis(parse(
                "REMOTE_TIMEOUT_MS",
                "a number of milliseconds",
                10_000u64,
            )?),
            host,
            port,
        })
    }

    /// Configuration used by route tests: loopback, no browser, no OAuth.
    #[cfg(test)]
    pub fn for_tests(dir: &std::path::Path) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            app_url: "http://localhost:3000".to_string(),
            production: false,
            open_browser: false,
            database_path: dir.join("sessions.sqlite"),
            endpoints_file: dir.join("endpoints.json"),
            oauth: None,
            drive_folder_name: "Email Generator Templates".to_string(),
            render_timeout: Duration::from_millis(2_000),
            render_memory_limit: 8 * 1024 * 1024,
            remote_timeout: Duration::from_millis(500),
        }
    }
}

/// Reads a non-empty variable.
fn var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse<T: std::str::FromStr>(
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            key,
            expected,
            value,
        }),
    }
}
