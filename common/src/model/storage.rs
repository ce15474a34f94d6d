use serde::{Deserialize, Serialize};

/// A file inside the application folder of the remote storage account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Extensions shown when listing the application folder.
const LISTED_EXTENSIONS: [&str; 3] = [".lua", ".html", ".txt"];

impl StoredFile {
    pub fn is_listed(&self) -> bool {
        let name = self.name.to_lowercase();
        LISTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    }
}

/// Kinds of document that may be uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Template source.
    Lua,
    /// Rendered markup.
    Html,
}

impl FileKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "lua" => Some(FileKind::Lua),
            "html" => Some(FileKind::Html),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Lua => "lua",
            FileKind::Html => "html",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileKind::Lua => "text/x-lua",
            FileKind::Html => "text/html",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Lua => ".lua",
            FileKind::Html => ".html",
        }
    }

    /// Appends the extension unless the name already carries it.
    pub fn file_name(&self, name: &str) -> String {
        let name = name.trim();
        if name.to_lowercase().ends_with(self.extension()) {
            name.to_string()
        } else {
            format!("{}{}", name, self.extension())
        }
    }
}

/// Result of an upload, whether it created or replaced the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub file_id: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
}

/// Body of `GET /api/storage/files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileListing {
    pub files: Vec<StoredFile>,
    pub success: bool,
}

/// Body of `GET /api/storage/download`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadedFile {
    pub content: String,
    pub success: bool,
}

/// Body of `POST /api/storage/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(flatten)]
    pub result: UploadResult,
    pub success: bool,
}
