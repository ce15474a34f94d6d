use crate::api::StorageClient;
use common::model::storage::{FileKind, StoredFile, UploadResponse};

pub enum Msg {
    SessionLoaded(Result<StorageClient, String>),
    SignIn,
    SignOut,
    SignedOut(Result<(), String>),
    ToggleFiles,
    Refresh,
    FilesLoaded(Result<Vec<StoredFile>, String>),
    Open(String),
    Opened(Result<String, String>),
    ShowSaveSheet(FileKind),
    CloseSaveSheet,
    SetSaveName(String),
    Save,
    Saved {
        kind: FileKind,
        content: String,
        result: Result<UploadResponse, String>,
    },
}
