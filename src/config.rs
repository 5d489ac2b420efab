//! Application-level configuration loading: tournament groups, admin gate and storage backend.

use std::{env, fs, io::ErrorKind, path::PathBuf, str::FromStr};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_CONFIG_PATH";
/// Environment variable overriding the configured admin token.
const ADMIN_TOKEN_ENV: &str = "SCOREBOARD_ADMIN_TOKEN";
/// Environment variable overriding the configured storage backend.
const STORAGE_ENV: &str = "SCOREBOARD_STORAGE";
/// Groups used when the configuration does not list any.
const DEFAULT_GROUPS: [&str; 4] = ["A", "B", "C", "D"];

/// Persistence backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// MongoDB, supervised in the background.
    Mongo,
    /// Process-local store, lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    groups: Vec<String>,
    admin_token: Option<String>,
    storage: StorageBackend,
}

impl AppConfig {
    /// Load the configuration from disk, then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_file();

        if let Ok(token) = env::var(ADMIN_TOKEN_ENV) {
            config.admin_token = Some(token).filter(|token| !token.is_empty());
        }
        if let Ok(value) = env::var(STORAGE_ENV) {
            match value.parse() {
                Ok(storage) => config.storage = storage,
                Err(err) => warn!(error = %err, "ignoring {STORAGE_ENV}"),
            }
        }

        config
    }

    fn load_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        groups = app_config.groups.len(),
                        storage = ?app_config.storage,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Replace the admin token, mostly useful when wiring tests.
    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    /// Replace the configured groups.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Configured group labels, in display order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Return the configured label matching `input`, ignoring case and surrounding spaces.
    pub fn canonical_group(&self, input: &str) -> Option<&str> {
        let input = input.trim();
        self.groups
            .iter()
            .find(|group| group.eq_ignore_ascii_case(input))
            .map(String::as_str)
    }

    /// Token required on mutating routes, when configured.
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }

    /// Selected storage backend.
    pub fn storage(&self) -> StorageBackend {
        self.storage
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            groups: DEFAULT_GROUPS.iter().map(|group| group.to_string()).collect(),
            admin_token: None,
            storage: StorageBackend::Mongo,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    admin_token: Option<String>,
    #[serde(default)]
    storage: Option<StorageBackend>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let groups: Vec<String> = value
            .groups
            .into_iter()
            .map(|group| group.trim().to_owned())
            .filter(|group| !group.is_empty())
            .collect();

        Self {
            groups: if groups.is_empty() {
                defaults.groups
            } else {
                groups
            },
            admin_token: value.admin_token.filter(|token| !token.is_empty()),
            storage: value.storage.unwrap_or(defaults.storage),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_group_ignores_case_and_spaces() {
        let config = AppConfig::default();
        assert_eq!(config.canonical_group(" b "), Some("B"));
        assert_eq!(config.canonical_group("E"), None);
    }

    #[test]
    fn raw_config_without_groups_keeps_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"groups": [" ", ""], "storage": "memory"}"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.groups(), ["A", "B", "C", "D"]);
        assert_eq!(config.storage(), StorageBackend::Memory);
        assert_eq!(config.admin_token(), None);
    }

    #[test]
    fn raw_config_overrides_groups_and_token() {
        let raw: RawConfig = serde_json::from_str(
            r#"{"groups": ["North", "South"], "admin_token": "s3cret"}"#,
        )
        .unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.groups(), ["North", "South"]);
        assert_eq!(config.admin_token(), Some("s3cret"));
        assert_eq!(config.storage(), StorageBackend::Mongo);
    }

    #[test]
    fn storage_backend_parses_aliases() {
        assert_eq!("MongoDB".parse(), Ok(StorageBackend::Mongo));
        assert_eq!("memory".parse(), Ok(StorageBackend::Memory));
        assert!("couch".parse::<StorageBackend>().is_err());
    }
}
