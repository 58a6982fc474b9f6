//! Token and endpoint configuration
//!
//! Reads/writes `<config-dir>/soldo/auth.json` (0600 on Unix). Environment
//! variables override the file: `SOLDO_API_BASE` and `SOLDO_TOKEN`.
//!
//! The token is opaque to this client; it is obtained out of band and only
//! ever forwarded as a bearer header.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Credentials stored locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token for the finance backend
    pub token: String,
    /// API base URL, when different from the default
    #[serde(default)]
    pub api_base: Option<String>,
}

/// Resolved settings for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub token: Option<String>,
}

impl Config {
    /// Environment first, then the credentials file, then defaults
    pub fn resolve() -> Self {
        let saved = load_credentials();
        let api_base = std::env::var("SOLDO_API_BASE")
            .ok()
            .or_else(|| saved.as_ref().and_then(|c| c.api_base.clone()))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let token = std::env::var("SOLDO_TOKEN")
            .ok()
            .or_else(|| saved.map(|c| c.token));
        if token.is_none() {
            log::debug!("no token configured; requests will be anonymous");
        }
        Self { api_base, token }
    }
}

/// Returns the path to the credentials file
pub fn credentials_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("soldo/auth.json"))
}

/// Load saved credentials from disk
///
/// Returns `None` if nothing is saved or the file is invalid.
pub fn load_credentials() -> Option<Credentials> {
    let path = credentials_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save credentials, creating the parent directory if needed
pub fn save_credentials(creds: &Credentials) -> Result<(), String> {
    let path = credentials_path().ok_or("Could not determine config directory")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

    std::fs::write(&path, &contents).map_err(|e| format!("Failed to write auth file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {}", e))?;
    }

    Ok(())
}

/// Delete saved credentials
pub fn delete_credentials() -> Result<(), String> {
    let Some(path) = credentials_path() else {
        return Ok(());
    };
    if path.exists() {
        std::fs::remove_file(&path).map_err(|e| format!("Failed to delete auth file: {}", e))?;
    }
    Ok(())
}
