//! Persisted record of the signed-in user.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::AuthUser;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session file {path} could not be accessed")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session could not be encoded")]
    Json(#[from] serde_json::Error),
}

/// One JSON document holding the current [`AuthUser`]. Its presence on load
/// means the user is already signed in.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored user. A missing file is no session; an unreadable
    /// document is logged and treated the same way.
    pub fn load(&self) -> Result<Option<AuthUser>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        match serde_json::from_str::<AuthUser>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring corrupt session file");
                Ok(None)
            }
        }
    }

    pub fn save(&self, user: &AuthUser) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let body = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, body).map_err(|source| self.io_error(source))?;
        info!(user_id = %user.id, role = ?user.role, "session saved");
        Ok(())
    }

    /// Removes the stored user. Returns whether a session existed.
    pub fn clear(&self) -> Result<bool, SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "session cleared");
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
