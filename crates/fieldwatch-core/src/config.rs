//! Configuration loading for the Fieldwatch server.
//!
//! Settings come from an optional `fieldwatch.yaml` file (path overridable
//! through `FIELDWATCH_CONFIG`) and are then overridden by environment
//! variables:
//!
//! - `HOST`, `PORT`, `MAX_BODY_BYTES` override `server.*`
//! - `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`,
//!   `DATABASE_ACQUIRE_TIMEOUT_SECS`, `DATABASE_IDLE_TIMEOUT_SECS` override
//!   `store.*`
//! - `FIELDWATCH_STORE` selects `postgres` or `memory`

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "fieldwatch.yaml";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_VAR: &str = "FIELDWATCH_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {key}: {message}")]
    Invalid {
        /// The offending variable.
        key: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The `postgres` store was selected without a connection URL.
    #[error("DATABASE_URL is required when the postgres store is selected")]
    MissingDatabaseUrl,
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Persistence settings.
    #[serde(default)]
    pub store: StoreSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Which store implementation backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// `PostgreSQL` via `fieldwatch-db`.
    #[default]
    Postgres,
    /// Process-local maps; data is lost on restart.
    Memory,
}

impl core::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend {other:?}")),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreSettings {
    /// Selected backend.
    #[serde(default)]
    pub backend: StoreBackend,

    /// `PostgreSQL` connection URL.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds a query waits for a free pooled connection.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    /// Seconds before an idle pooled connection is closed.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    5000
}

/// 50 MiB, enough for base64-encoded photos.
const fn default_max_body_bytes() -> usize {
    52_428_800
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_acquire_timeout_secs() -> u64 {
    5
}

const fn default_idle_timeout_secs() -> u64 {
    300
}

impl AppConfig {
    /// Load from the configured file (if any) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, an
    /// override is malformed, or the result is inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML config file without applying overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Yaml`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse YAML without applying overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from `lookup`, which maps variable names to values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric or enum value does not
    /// parse.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(limit) = lookup("MAX_BODY_BYTES") {
            self.server.max_body_bytes = parse_var("MAX_BODY_BYTES", &limit)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.store.database_url = Some(url);
        }
        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.store.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &max)?;
        }
        if let Some(secs) = lookup("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.store.acquire_timeout_secs = parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = lookup("DATABASE_IDLE_TIMEOUT_SECS") {
            self.store.idle_timeout_secs = parse_var("DATABASE_IDLE_TIMEOUT_SECS", &secs)?;
        }
        if let Some(backend) = lookup("FIELDWATCH_STORE") {
            self.store.backend = parse_var("FIELDWATCH_STORE", &backend)?;
        }
        Ok(())
    }

    /// Check cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] for the postgres backend
    /// without a URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_url = self
            .store
            .database_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if self.store.backend == StoreBackend::Postgres && !has_url {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.max_body_bytes, 52_428_800);
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(config.store.max_connections, 10);
        assert_eq!(config.store.acquire_timeout_secs, 5);
        assert_eq!(config.store.idle_timeout_secs, 300);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = r"
server:
  port: 8081
store:
  backend: memory
";
        let config = AppConfig::parse(yaml).unwrap_or_default();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_yaml() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(env(&[
            ("PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/fieldwatch"),
            ("FIELDWATCH_STORE", "Postgres"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ]));
        assert!(result.is_ok());
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.max_connections, 4);
        assert_eq!(
            config.store.database_url.as_deref(),
            Some("postgres://localhost/fieldwatch")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn pool_timeouts_from_yaml_and_env() {
        let yaml = r"
store:
  acquire_timeout_secs: 12
";
        let mut config = AppConfig::parse(yaml).unwrap_or_default();
        assert_eq!(config.store.acquire_timeout_secs, 12);
        assert_eq!(config.store.idle_timeout_secs, 300);

        let result = config.apply_overrides(env(&[("DATABASE_IDLE_TIMEOUT_SECS", "45")]));
        assert!(result.is_ok());
        assert_eq!(config.store.acquire_timeout_secs, 12);
        assert_eq!(config.store.idle_timeout_secs, 45);

        let err = config
            .apply_overrides(env(&[("DATABASE_ACQUIRE_TIMEOUT_SECS", "-1")]))
            .err();
        assert!(matches!(
            err,
            Some(ConfigError::Invalid {
                key: "DATABASE_ACQUIRE_TIMEOUT_SECS",
                ..
            })
        ));
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut config = AppConfig::default();
        let err = config.apply_overrides(env(&[("PORT", "eighty")])).err();
        assert!(matches!(err, Some(ConfigError::Invalid { key: "PORT", .. })));
    }

    #[test]
    fn postgres_requires_url() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingDatabaseUrl)
        ));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            AppConfig::parse("server: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }
}
