//! Object storage access.
//!
//! Partner files, metadata tables and log files all live in buckets addressed
//! by `/`-separated keys. [`LocalObjectStore`] maps each bucket to a directory
//! and [`MemoryObjectStore`] keeps everything in a map for tests and dry runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

use crate::error::StorageError;

type StorageResult<T> = std::result::Result<T, StorageError>;

/// Minimal object-store interface used by the validator.
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's bytes.
    fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// Create or replace an object.
    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> StorageResult<()>;

    /// Keys in `bucket` starting with `prefix`, sorted.
    fn list_keys(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<String>>;

    /// Fetch an object, mapping absence to `None`.
    fn get_optional(&self, bucket: &str, key: &str) -> StorageResult<Option<Vec<u8>>> {
        match self.get_object(bucket, key) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Buckets stored as directories under a root.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> StorageResult<PathBuf> {
        let relative = checked_relative(bucket)?;
        Ok(self.root.join(relative))
    }

    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        let relative = checked_relative(key)?;
        Ok(self.bucket_dir(bucket)?.join(relative))
    }
}

/// Reject keys that would escape their bucket directory.
fn checked_relative(key: &str) -> StorageResult<PathBuf> {
    let path = Path::new(key);
    let safe = !key.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if safe {
        Ok(path.to_path_buf())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn collect_keys(dir: &Path, base: &Path, keys: &mut Vec<String>) -> StorageResult<()> {
    let entries = fs::read_dir(dir).map_err(|err| io_error(dir, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| io_error(dir, err))?;
        let path = entry.path();
        if path.is_dir() {
            collect_keys(&path, base, keys)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            let key = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            keys.push(key);
        }
    }
    Ok(())
}

impl ObjectStore for LocalObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            _ => io_error(&path, err),
        })
    }

    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> StorageResult<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| io_error(parent, err))?;
        }
        fs::write(&path, body).map_err(|err| io_error(&path, err))?;
        tracing::debug!(bucket, key, bytes = body.len(), "object written");
        Ok(())
    }

    fn list_keys(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<String>> {
        let base = self.bucket_dir(bucket)?;
        if !base.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        collect_keys(&base, &base, &mut keys)?;
        keys.retain(|key| key.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }
}

/// In-memory buckets.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<(String, String), Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used to seed fixtures.
    pub fn with_object(self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) -> Self {
        self.insert(bucket, key, body);
        self
    }

    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        let mut objects = self
            .objects
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        objects.insert((bucket.to_string(), key.to_string()), body.into());
    }

    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let objects = self
            .objects
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> StorageResult<()> {
        self.insert(bucket, key, body);
        Ok(())
    }

    fn list_keys(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<String>> {
        let objects = self
            .objects
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(objects
            .keys()
            .filter(|(b, key)| b == bucket && key.starts_with(prefix))
            .map(|(_, key)| key.clone())
            .collect())
    }
}
