//! Persisted client session.
//!
//! The identity id and token are one JSON document, so they are written and
//! removed together.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use workforce_core::UserId;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub user_id: UserId,
    pub token: String,
}

impl core::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StoredSession")
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("stored session is unreadable: {0}")]
    Corrupt(String),
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredSession>, SessionError>;

    fn save(&self, session: &StoredSession) -> Result<(), SessionError>;

    /// Remove the stored pair. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Session persisted as a JSON file.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a reader never observes a half-written pair.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| SessionError::Corrupt(e.to_string()))
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;
        let bytes =
            serde_json::to_vec(session).map_err(|e| SessionError::Corrupt(e.to_string()))?;

        // The temp file must share a filesystem with the target for the rename.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Session held only for the life of the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    slot: Mutex<Option<StoredSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

fn poisoned() -> SessionError {
    SessionError::Io(io::Error::other("session lock poisoned"))
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        Ok(self.slot.lock().map_err(|_| poisoned())?.clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        *self.slot.lock().map_err(|_| poisoned())? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock().map_err(|_| poisoned())? = None;
        Ok(())
    }
}
