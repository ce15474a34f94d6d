use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Request payload for `POST /api/templates/render`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Template source as typed in the editor.
    #[serde(default)]
    pub code: String,
    /// Explicit value for the template's `API` table. Takes precedence over
    /// `use_endpoint_data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    /// Named asset strings exposed as `ASSETS`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, String>,
    /// Use the last fetched endpoint responses as `API`.
    #[serde(default)]
    pub use_endpoint_data: bool,
}

/// Request payload for `POST /api/storage/upload`.
///
/// Fields default to empty so a missing one is reported as a 400 by the
/// handler instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default, rename = "type")]
    pub file_type: String,
}

/// Query string of `GET /api/storage/download`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadQuery {
    #[serde(default)]
    pub file_id: Option<String>,
}
