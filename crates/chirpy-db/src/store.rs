use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use chirpy_types::Result;

use crate::document::Document;

/// JSON document on disk behind a process-wide reader/writer lock.
///
/// Loads share the lock; saves and read-modify-write cycles hold it
/// exclusively. Saves go through a temp file and a rename so the target is
/// never observed half-written.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    lock: RwLock<()>,
}

impl Store {
    /// Open the backing file, creating it empty if it doesn't exist, and
    /// read it once so an unusable store fails here rather than per request.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => info!("Created empty store at {}", path.display()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }

        let store = Self {
            path,
            lock: RwLock::new(()),
        };
        store.read_document()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Document> {
        let _guard = self.read_lock();
        self.read_document()
    }

    pub fn save(&self, doc: &Document) -> Result<()> {
        let _guard = self.write_lock();
        self.write_document(doc)
    }

    /// Load, apply `f`, and save, all under the exclusive lock. Nothing is
    /// written if `f` fails.
    pub fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let _guard = self.write_lock();
        let mut doc = self.read_document()?;
        let out = f(&mut doc)?;
        self.write_document(&doc)?;
        Ok(out)
    }

    fn read_document(&self) -> Result<Document> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::default()),
            Err(e) => return Err(e.into()),
        };
        debug!("Read {} bytes from {}", raw.len(), self.path.display());

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::default());
        }
        Ok(serde_json::from_slice(&raw)?)
    }

    fn write_document(&self, doc: &Document) -> Result<()> {
        let raw = serde_json::to_vec(doc)?;
        let tmp = self.temp_path();

        let replaced = File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(&raw)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = replaced {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!("Could not remove {}: {}", tmp.display(), cleanup);
                }
            }
            return Err(e.into());
        }

        self.sync_parent()?;
        debug!("Wrote {} bytes to {}", raw.len(), self.path.display());
        Ok(())
    }

    // Make the rename itself durable.
    #[cfg(unix)]
    fn sync_parent(&self) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        File::open(parent)?.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> Result<()> {
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    // The lock guards no data, only file access, so a poisoned lock is safe
    // to reuse: the document on disk is whatever the last rename left.
    fn read_lock(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(|e| e.into_inner())
    }
}
