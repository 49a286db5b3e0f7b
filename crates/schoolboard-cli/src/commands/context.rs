//! What every backend-facing command needs: config, backend and session.

use std::path::PathBuf;

use anyhow::Result;

use schoolboard_client::config::load_config_from;
use schoolboard_client::{create_backend, HttpBackend, SchoolboardConfig, SessionStore};
use schoolboard_core::error::{ApiError, SubmitError};
use schoolboard_core::session::Session;
use schoolboard_core::traits::StatusChangeError;

pub struct Context {
    pub config: SchoolboardConfig,
    pub store: SessionStore,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config = load_config_from(config_path.as_deref())?;
        let store = SessionStore::new(config.session_path());
        Ok(Self { config, store })
    }

    pub fn backend(&self) -> Result<HttpBackend> {
        create_backend(&self.config)
    }

    /// The stored session plus a backend to use it with.
    pub fn connect(&self) -> Result<(HttpBackend, Session)> {
        let session = self.store.require().map_err(|e| match e.downcast::<ApiError>() {
            Ok(api) => self.on_api_error(api),
            Err(other) => other,
        })?;
        Ok((self.backend()?, session))
    }

    /// Drop the stored session when the backend no longer accepts it.
    pub fn api<T>(&self, result: Result<T, ApiError>) -> Result<T> {
        result.map_err(|e| self.on_api_error(e))
    }

    pub fn submit<T>(&self, result: Result<T, SubmitError>) -> Result<T> {
        result.map_err(|e| match e {
            SubmitError::Api(e) => self.on_api_error(e),
            invalid => invalid.into(),
        })
    }

    pub fn status_change<T>(&self, result: Result<T, StatusChangeError>) -> Result<T> {
        result.map_err(|e| match e {
            StatusChangeError::Api(e) => self.on_api_error(e),
            invalid => invalid.into(),
        })
    }

    fn on_api_error(&self, err: ApiError) -> anyhow::Error {
        if matches!(err, ApiError::Unauthorized(_) | ApiError::SessionExpired) {
            match self.store.clear() {
                Ok(true) => tracing::warn!("session rejected, stored session removed"),
                Ok(false) => {}
                Err(e) => tracing::warn!("failed to remove stale session: {e:#}"),
            }
        }
        err.into()
    }
}
