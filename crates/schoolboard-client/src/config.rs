//! Client configuration and backend factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use schoolboard_core::traits::Credentials;

use crate::http::HttpBackend;

/// Stored login credentials, both optional.
///
/// Note: Custom Debug impl masks the password to prevent accidental exposure in logs.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl AuthConfig {
    /// Credentials, with explicit values taking precedence over stored ones.
    pub fn credentials(&self, email: Option<String>, password: Option<String>) -> Option<Credentials> {
        Some(Credentials {
            email: email.or_else(|| self.email.clone())?,
            password: password.or_else(|| self.password.clone())?,
        })
    }
}

/// Top-level schoolboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolboardConfig {
    /// API base URL; resource paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Rows per page in list views.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Where the login session is kept.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> usize {
    10
}

impl Default for SchoolboardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            page_size: default_page_size(),
            session_file: None,
            auth: AuthConfig::default(),
        }
    }
}

impl SchoolboardConfig {
    /// The session file, defaulting to `~/.config/schoolboard/session.json`.
    pub fn session_path(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| {
            dirs_path()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("session.json")
        })
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `schoolboard.toml` in the current directory
/// 2. `~/.config/schoolboard/config.toml`
///
/// Environment variable overrides: `SCHOOLBOARD_BASE_URL`, `SCHOOLBOARD_EMAIL`,
/// `SCHOOLBOARD_PASSWORD`.
pub fn load_config() -> Result<SchoolboardConfig> {
    load_config_from(None)
}

/// The config file that would be loaded, if any exists.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("schoolboard.toml");
    if local.exists() {
        return Some(local);
    }
    let global = dirs_path()?.join("config.toml");
    global.exists().then_some(global)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SchoolboardConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => find_config_file(),
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SchoolboardConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SchoolboardConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("SCHOOLBOARD_BASE_URL") {
        config.base_url = url;
    }
    if let Ok(email) = std::env::var("SCHOOLBOARD_EMAIL") {
        config.auth.email = Some(email);
    }
    if let Ok(password) = std::env::var("SCHOOLBOARD_PASSWORD") {
        config.auth.password = Some(password);
    }

    config.base_url = resolve_env_vars(&config.base_url)
        .trim_end_matches('/')
        .to_string();
    config.auth.email = config.auth.email.as_deref().map(resolve_env_vars);
    config.auth.password = config.auth.password.as_deref().map(resolve_env_vars);
    config.session_file = config
        .session_file
        .as_ref()
        .map(|p| PathBuf::from(resolve_env_vars(&p.to_string_lossy())));

    anyhow::ensure!(config.timeout_secs > 0, "timeout_secs must be at least 1");
    anyhow::ensure!(config.page_size > 0, "page_size must be at least 1");

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("schoolboard"))
}

/// Create the HTTP backend described by the configuration.
pub fn create_backend(config: &SchoolboardConfig) -> Result<HttpBackend> {
    HttpBackend::new(&config.base_url, config.timeout_secs)
        .with_context(|| format!("failed to set up client for {}", config.base_url))
}
