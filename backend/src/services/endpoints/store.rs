//! File-backed list of endpoint descriptors.
//!
//! The list lives in a single JSON file. Every read goes back to the file, so
//! two app instances sharing it never work from a stale copy: the last write
//! wins and the next read sees it. Writes replace the file atomically through
//! a temporary sibling, and a mutex serializes read-modify-write cycles
//! within this process.
//!
//! All methods block; handlers call them through `web::block`.

use crate::error::StoreError;
use common::model::endpoint::{EndpointDescriptor, EndpointDraft};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;

#[derive(Debug)]
pub struct EndpointStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl EndpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Result<Vec<EndpointDescriptor>, StoreError> {
        let _guard = self.lock();
        self.load()
    }

    pub fn create(&self, draft: EndpointDraft) -> Result<EndpointDescriptor, StoreError> {
        let _guard = self.lock();
        let mut endpoints = self.load()?;
        let descriptor = draft
            .into_descriptor(uuid::Uuid::new_v4().to_string(), &endpoints)
            .map_err(StoreError::InvalidEndpoint)?;
        endpoints.push(descriptor.clone());
        self.persist(&endpoints)?;
        Ok(descriptor)
    }

    /// Replaces the descriptor `id`, keeping its position in the list.
    ///
    /// Returns the previous and the new version.
    pub fn update(
        &self,
        id: &str,
        draft: EndpointDraft,
    ) -> Result<(EndpointDescriptor, EndpointDescriptor), StoreError> {
        let _guard = self.lock();
        let mut endpoints = self.load()?;
        let index = endpoints
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::EndpointNotFound(id.to_string()))?;
        let descriptor = draft
            .into_descriptor(id.to_string(), &endpoints)
            .map_err(StoreError::InvalidEndpoint)?;
        let previous = std::mem::replace(&mut endpoints[index], descriptor.clone());
        self.persist(&endpoints)?;
        Ok((previous, descriptor))
    }

    /// Removes and returns the descriptor `id`.
    pub fn delete(&self, id: &str) -> Result<EndpointDescriptor, StoreError> {
        let _guard = self.lock();
        let mut endpoints = self.load()?;
        let index = endpoints
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::EndpointNotFound(id.to_string()))?;
        let removed = endpoints.remove(index);
        self.persist(&endpoints)?;
        Ok(removed)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock();
        self.persist(&[])
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<Vec<EndpointDescriptor>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, endpoints: &[EndpointDescriptor]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, endpoints)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::endpoint::HttpMethod;
    use tempfile::TempDir;

    fn draft(name: &str) -> EndpointDraft {
        EndpointDraft {
            name: name.to_string(),
            url: "https://api.example.com/items".to_string(),
            method: Some(HttpMethod::Get),
            ..Default::default()
        }
    }

    fn store() -> (TempDir, EndpointStore) {
        let dir = TempDir::new().unwrap();
        let store = EndpointStore::new(dir.path().join("config/endpoints.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_is_an_empty_list() {
        let (_dir, store) = store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn create_update_delete_round_trip() {
        let (_dir, store) = store();
        let created = store.create(draft("Product")).unwrap();
        store.create(draft("Orders")).unwrap();

        let mut edit = draft("product");
        edit.method = Some(HttpMethod::Post);
        edit.body = Some("{\"id\": 1}".to_string());
        let (previous, updated) = store.update(&created.id, edit).unwrap();
        assert_eq!(previous.name, "Product");
        assert_eq!(updated.name, "product");
        assert_eq!(store.list().unwrap()[0].method, HttpMethod::Post);

        let removed = store.delete(&created.id).unwrap();
        assert_eq!(removed.id, created.id);
        assert_eq!(store.list().unwrap().len(), 1);
        assert!(matches!(
            store.delete(&created.id),
            Err(StoreError::EndpointNotFound(_))
        ));
    }

    #[test]
    fn duplicates_are_rejected_case_insensitively() {
        let (_dir, store) = store();
        store.create(draft("Product")).unwrap();
        match store.create(draft("product")) {
            Err(StoreError::InvalidEndpoint(errors)) => {
                assert_eq!(errors, vec!["An endpoint named \"product\" already exists"]);
            }
            other => panic!("expected a validation error, got {:?}", other),
        }
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn external_writes_are_seen_on_the_next_read() {
        let (_dir, store) = store();
        store.create(draft("Product")).unwrap();
        let other = EndpointStore::new(store.path().to_path_buf());
        other.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
    }
}
