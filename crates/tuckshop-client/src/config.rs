//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so the client starts with only the credential
//! file present in the working directory.

use std::path::PathBuf;

use tuckshop_shared::constants::{
    DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, DEFAULT_CREDENTIALS_FILE, ENV_CREDENTIALS,
    ENV_DB_PATH,
};

use crate::session::AdminCredentials;

/// Client configuration, shared as `Arc<ShopConfig>` through [`AppState`].
///
/// [`AppState`]: crate::state::AppState
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Service-account key file. Required at start-up.
    /// Env: `TUCKSHOP_CREDENTIALS`
    /// Default: `ServiceAccountKey.json`
    pub credentials_path: PathBuf,

    /// Explicit database file, bypassing the per-project data directory.
    /// Env: `TUCKSHOP_DB_PATH`
    /// Default: unset.
    pub database_path: Option<PathBuf>,

    /// Administrator accepted by the login screen.
    pub admin: AdminCredentials,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            database_path: None,
            admin: AdminCredentials::new(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD),
        }
    }
}

impl ShopConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_CREDENTIALS) {
            if path.trim().is_empty() {
                tracing::warn!(var = ENV_CREDENTIALS, "Empty credential path, using default");
            } else {
                config.credentials_path = PathBuf::from(path);
            }
        }

        if let Some(path) = lookup(ENV_DB_PATH) {
            if path.trim().is_empty() {
                tracing::warn!(var = ENV_DB_PATH, "Empty database path, ignoring");
            } else {
                config.database_path = Some(PathBuf::from(path));
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = ShopConfig::from_lookup(lookup(&[]));
        assert_eq!(config.credentials_path, PathBuf::from("ServiceAccountKey.json"));
        assert!(config.database_path.is_none());
        assert!(config.admin.verify("Admin", "1234"));
    }

    #[test]
    fn env_overrides_paths() {
        let config = ShopConfig::from_lookup(lookup(&[
            ("TUCKSHOP_CREDENTIALS", "/etc/tuckshop/key.json"),
            ("TUCKSHOP_DB_PATH", "/tmp/shop.db"),
        ]));
        assert_eq!(config.credentials_path, PathBuf::from("/etc/tuckshop/key.json"));
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/shop.db")));
    }

    #[test]
    fn empty_values_are_ignored() {
        let config = ShopConfig::from_lookup(lookup(&[
            ("TUCKSHOP_CREDENTIALS", "  "),
            ("TUCKSHOP_DB_PATH", ""),
        ]));
        assert_eq!(config.credentials_path, PathBuf::from("ServiceAccountKey.json"));
        assert!(config.database_path.is_none());
    }
}
