//! Flat-file persistence for record collections.
//!
//! Each collection lives in its own pretty-printed JSON array under the data
//! directory. Writes go through a temp file that is renamed over the target,
//! after a best-effort copy of the previous content to `<file>.backup`.
//! File work runs on the blocking pool.

use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Monitors,
    Incidents,
}

impl Collection {
    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Monitors => "monitors.json",
            Collection::Incidents => "incidents.json",
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Invalid JSON in {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Owns the data directory and serializes writers within this process.
///
/// Callers doing read-modify-write hold the collection's guard from
/// [`JsonStore::lock`] for the whole sequence.
#[derive(Debug)]
pub struct JsonStore {
    data_dir: PathBuf,
    monitors_lock: Mutex<()>,
    incidents_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            monitors_lock: Mutex::new(()),
            incidents_lock: Mutex::new(()),
        }
    }

    pub fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    pub fn backup_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!("{}.backup", collection.file_name()))
    }

    pub async fn lock(&self, collection: Collection) -> MutexGuard<'_, ()> {
        match collection {
            Collection::Monitors => self.monitors_lock.lock().await,
            Collection::Incidents => self.incidents_lock.lock().await,
        }
    }

    /// Loads every record of a collection in on-disk order.
    ///
    /// A missing file is created empty. Content that is not a JSON array of
    /// the expected record shape is always reported as [`StoreError::Corrupt`].
    pub async fn read<T>(&self, collection: Collection) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let data_dir = self.data_dir.clone();
        let path = self.path(collection);
        let backup = self.backup_path(collection);
        run_blocking(path.clone(), move || read_records(&data_dir, &path, &backup)).await
    }

    /// Replaces the collection on disk.
    pub async fn write<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<(), StoreError> {
        let path = self.path(collection);
        let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Encode {
            path: path.clone(),
            source,
        })?;

        let data_dir = self.data_dir.clone();
        let backup = self.backup_path(collection);
        let target = path.clone();
        run_blocking(path.clone(), move || write_file(&data_dir, &target, &backup, &json)).await?;

        info!(count = records.len(), path = %path.display(), "Wrote collection.");
        Ok(())
    }
}

/// Runs blocking file work off the async workers.
async fn run_blocking<R, F>(path: PathBuf, work: F) -> Result<R, StoreError>
where
    R: Send + 'static,
    F: FnOnce() -> Result<R, StoreError> + Send + 'static,
{
    task::spawn_blocking(work)
        .await
        .map_err(|e| StoreError::Io {
            path,
            source: io::Error::other(e),
        })?
}

fn read_records<T: DeserializeOwned>(
    data_dir: &Path,
    path: &Path,
    backup: &Path,
) -> Result<Vec<T>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Collection file not found, creating empty file.");
            write_file(data_dir, path, backup, "[]")?;
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(data_dir: &Path, path: &Path, backup: &Path, contents: &str) -> Result<(), StoreError> {
    let io_err = |source: io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(data_dir).map_err(io_err)?;

    if path.exists() {
        if let Err(e) = fs::copy(path, backup) {
            warn!(path = %backup.display(), error = %e, "Failed to write backup, continuing with write.");
        }
    }

    let mut tmp = NamedTempFile::new_in(data_dir).map_err(io_err)?;
    tmp.write_all(contents.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
