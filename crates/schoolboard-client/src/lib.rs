//! schoolboard-client: talking to the school-management backend.
//!
//! Implements the `SchoolApi` trait over HTTP, normalizes the backend's
//! response envelopes, loads configuration, and persists the login session.

pub mod config;
pub mod envelope;
pub mod http;
pub mod mock;
pub mod session_store;

pub use config::{create_backend, load_config, AuthConfig, SchoolboardConfig};
pub use http::HttpBackend;
pub use mock::MockBackend;
pub use session_store::SessionStore;
