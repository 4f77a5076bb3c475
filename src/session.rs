//! Persisted sign-in.
//!
//! The session lives in a small JSON object on disk. The `"jwt"` key holds
//! the serialized [`Session`]; other keys are left alone on write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use taskboard_common::Session;

use crate::errors::SessionError;

const JWT_KEY: &str = "jwt";

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

    fn read_entries(&self) -> Result<BTreeMap<String, Value>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, Value>) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(entries).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, content).map_err(io_err)
    }

    /// The stored session, or `None` when nobody is signed in.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        let mut entries = self.read_entries()?;
        let Some(raw) = entries.remove(JWT_KEY) else {
            return Ok(None);
        };
        serde_json::from_value(raw)
            .map(Some)
            .map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    /// Like [`load`](Self::load), but a missing session is an error.
    pub fn require(&self) -> Result<Session, SessionError> {
        self.load()?.ok_or(SessionError::NotSignedIn)
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut entries = self.read_entries()?;
        let value = serde_json::to_value(session).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        entries.insert(JWT_KEY.to_string(), value);
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), member = %session.member_id, "session saved");
        Ok(())
    }

    /// Forget the session. Clearing when nothing is stored is not an error.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            // A corrupt file cannot hold a usable session; start over.
            Err(SessionError::Corrupt { .. }) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        let removed = entries.remove(JWT_KEY).is_some();
        if entries.is_empty() {
            match std::fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(SessionError::Io {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        } else if removed {
            self.write_entries(&entries)?;
        }
        debug!(path = %self.path.display(), "session cleared");
        Ok(())
    }
}
