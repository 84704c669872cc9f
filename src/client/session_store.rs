use super::ClientError;
use crate::session::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Session token persisted between CLI runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
}

/// JSON file holding the shopper's session id.
///
/// The first load mints a token and writes it; later loads return the same one.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$STOREFRONT_HOME/session.json`, else `~/.storefront/session.json`
    pub fn default_location() -> Option<Self> {
        if let Ok(dir) = std::env::var("STOREFRONT_HOME") {
            if !dir.trim().is_empty() {
                let mut path = PathBuf::from(dir);
                path.push("session.json");
                return Some(Self::new(path));
            }
        }

        std::env::var("HOME").ok().map(|home| {
            let mut path = PathBuf::from(home);
            path.push(".storefront");
            path.push("session.json");
            Self::new(path)
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<StoredSession>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    pub fn load_or_create(&self) -> Result<StoredSession, ClientError> {
        match self.load()? {
            Some(session) => Ok(session),
            None => self.reset(),
        }
    }

    /// Replaces the stored token with a fresh one
    pub fn reset(&self) -> Result<StoredSession, ClientError> {
        let session = StoredSession {
            session_id: SessionId::generate(),
            created_at: Utc::now(),
        };
        self.save(&session)?;
        debug!(path = %self.path.display(), "stored new session id");
        Ok(session)
    }

    fn save(&self, session: &StoredSession) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}
