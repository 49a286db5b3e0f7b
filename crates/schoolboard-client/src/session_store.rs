//! On-disk persistence of the login session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use schoolboard_core::error::ApiError;
use schoolboard_core::session::Session;

/// A JSON file holding the current session.
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

    /// The stored session, if any.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read session: {}", self.path.display()))?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse session: {}", self.path.display()))?;
        Ok(Some(session))
    }

    /// The stored session, refusing missing or expired ones.
    pub fn require(&self) -> Result<Session> {
        let session = self.load()?.ok_or(ApiError::NotLoggedIn)?;
        if session.is_expired() {
            tracing::info!("stored session has expired");
            return Err(ApiError::SessionExpired.into());
        }
        Ok(session)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session).context("failed to serialize session")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write session to {}", self.path.display()))?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    /// Remove the stored session. Returns `false` if there was none.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove session: {}", self.path.display()))?;
        Ok(true)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use schoolboard_core::model::UserProfile;

    fn session(expires_at: Option<chrono::DateTime<Utc>>) -> Session {
        Session::new(
            "token",
            UserProfile {
                id: "u1".into(),
                name: "Admin".into(),
                email: "admin@school.test".into(),
                role: "admin".into(),
                school_id: Some("s1".into()),
            },
            expires_at,
        )
    }

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().unwrap().is_none());
        store.save(&session(None)).unwrap();
        assert_eq!(store.load().unwrap(), Some(session(None)));

        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn require_rejects_missing_and_expired() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        let err = store.require().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::NotLoggedIn)
        ));

        store
            .save(&session(Some(Utc::now() - Duration::hours(1))))
            .unwrap();
        let err = store.require().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::SessionExpired)
        ));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(SessionStore::new(path).load().is_err());
    }
}
