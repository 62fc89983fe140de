//! Persisted login session
//!
//! The logged-in identity survives a restart: it is stored as a small JSON
//! file under the platform data directory. A session is only valid when both
//! fields are present — partial or corrupt state is treated as logged-out
//! and wiped on sight, so a second load gives the same answer.

use crate::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

const SESSION_FILE: &str = "session.json";
const APP_DIR: &str = "absher-assistant";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub user_name: String,
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by the platform data directory.
    pub fn new() -> Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| {
            AssistantError::ConfigError("Could not resolve a data directory".into())
        })?;
        Ok(Self {
            path: base.join(APP_DIR).join(SESSION_FILE),
        })
    }

    /// Store backed by an explicit file, for tests and alternate profiles.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reconstruct the persisted session.
    ///
    /// Returns `None` when nothing is stored, and also when the stored value
    /// is partial or unparseable — in which case the bad state is cleared.
    pub fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;

        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Stored session is not valid JSON ({}), clearing", e);
                self.clear();
                return None;
            }
        };

        let user_id = value
            .get("user_id")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty());
        let user_name = value
            .get("user_name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty());

        match (user_id, user_name) {
            (Some(user_id), Some(user_name)) => {
                debug!("Restored session for {}", user_name);
                Some(Session {
                    user_id: user_id.to_string(),
                    user_name: user_name.to_string(),
                })
            }
            _ => {
                warn!("Stored session is partial, clearing");
                self.clear();
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string(session)
            .map_err(|e| AssistantError::IOError(format!("Failed to encode session: {}", e)))?;
        fs::write(&self.path, body)?;
        info!("Session persisted for {}", session.user_name);
        Ok(())
    }

    /// Remove any persisted session. Idempotent: a missing file is fine.
    pub fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to clear session file: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SessionStore {
        SessionStore::with_path(dir.path().join("session.json"))
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let session = Session {
            user_id: "u-123".into(),
            user_name: "Abdullah".into(),
        };
        store.save(&session).unwrap();

        assert_eq!(store.load(), Some(session));
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_partial_session_is_cleared_and_stays_cleared() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        fs::write(dir.path().join("session.json"), r#"{"user_id": "u-123"}"#).unwrap();

        assert_eq!(store.load(), None);
        // The partial file was removed as a side effect
        assert!(!dir.path().join("session.json").exists());
        // Idempotent: a second load gives the same answer
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_empty_fields_count_as_partial() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        fs::write(
            dir.path().join("session.json"),
            r#"{"user_id": "", "user_name": "Abdullah"}"#,
        )
        .unwrap();

        assert_eq!(store.load(), None);
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_corrupt_session_is_cleared() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        fs::write(dir.path().join("session.json"), "not json at all").unwrap();

        assert_eq!(store.load(), None);
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.clear();
        store.clear();

        store
            .save(&Session {
                user_id: "u-1".into(),
                user_name: "Fatimah".into(),
            })
            .unwrap();
        store.clear();
        assert_eq!(store.load(), None);
    }
}
