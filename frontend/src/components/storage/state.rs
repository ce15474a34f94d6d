use crate::api::StorageClient;
use common::model::storage::{FileKind, StoredFile};
use yew::prelude::*;

pub struct StoragePanel {
    pub client: StorageClient,
    pub files: Vec<StoredFile>,
    /// The file list dropdown is visible.
    pub files_open: bool,
    /// A storage call is in flight.
    pub busy: bool,
    pub save_sheet_ref: NodeRef,
    pub save_name: String,
    pub save_kind: FileKind,
    pub loaded: bool,
}

impl StoragePanel {
    pub fn new() -> Self {
        Self {
            client: StorageClient::default(),
            files: Vec::new(),
            files_open: false,
            busy: false,
            save_sheet_ref: NodeRef::default(),
            save_name: String::new(),
            save_kind: FileKind::Lua,
            loaded: false,
        }
    }
}
