// src/infrastructure/storage.rs
//
// Blob storage for uploaded media
//
// RULES:
// - Objects are opaque bytes plus a mime type, keyed by a relative path id
// - Ids never escape the storage root
// - A missing object is a NotFound error

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use log::debug;

use crate::domain::NotFoundError;
use crate::error::{AppError, AppResult};

const OBJECT_ENTITY: &str = "StoredObject";
const MIME_SUFFIX: &str = ".mime";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreObject {
    pub id: String,
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

pub trait Storage: Send + Sync {
    fn store(&self, object: StoreObject) -> AppResult<()>;

    fn get(&self, id: &str) -> AppResult<StoredObject>;
}

// ============================================================================
// IN-MEMORY
// ============================================================================

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

impl Storage for InMemoryStorage {
    fn store(&self, object: StoreObject) -> AppResult<()> {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                object.id,
                StoredObject {
                    data: object.data,
                    mime_type: object.mime_type,
                },
            );
        Ok(())
    }

    fn get(&self, id: &str) -> AppResult<StoredObject> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| NotFoundError::new(id, OBJECT_ENTITY).into())
    }
}

// ============================================================================
// LOCAL FILESYSTEM
// ============================================================================

/// Objects as files under `root`; the mime type lives in a `<file>.mime`
/// sidecar
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, id: &str) -> AppResult<PathBuf> {
        let relative = Path::new(id);
        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if id.is_empty() || !is_plain {
            return Err(AppError::Other(format!("Invalid storage id: {}", id)));
        }
        Ok(self.root.join(relative))
    }

    fn mime_path(path: &Path) -> PathBuf {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(MIME_SUFFIX);
        PathBuf::from(sidecar)
    }
}

impl Storage for LocalStorage {
    fn store(&self, object: StoreObject) -> AppResult<()> {
        let path = self.object_path(&object.id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, &object.data)?;
        let sidecar = Self::mime_path(&path);
        match &object.mime_type {
            Some(mime_type) => fs::write(&sidecar, mime_type)?,
            None if sidecar.exists() => fs::remove_file(&sidecar)?,
            None => {}
        }

        debug!("Stored {} ({} bytes)", object.id, object.data.len());
        Ok(())
    }

    fn get(&self, id: &str) -> AppResult<StoredObject> {
        let path = self.object_path(id)?;
        if !path.is_file() {
            return Err(NotFoundError::new(id, OBJECT_ENTITY).into());
        }

        let data = fs::read(&path)?;
        let sidecar = Self::mime_path(&path);
        let mime_type = if sidecar.is_file() {
            Some(fs::read_to_string(&sidecar)?)
        } else {
            None
        };

        Ok(StoredObject { data, mime_type })
    }
}
