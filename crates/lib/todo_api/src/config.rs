//! API server configuration.
//!
//! Sources are layered, later ones winning: built-in defaults, an optional
//! YAML file, environment variables, then whatever the binary passes from
//! its command line. The result is validated once and never mutated.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use todo_core::config::{AuthConfig, DEFAULT_TOKEN_TTL_SECS, resolve_persisted_secret};
use todo_core::repository::StorageBackend;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/todo";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {var}: {message}")]
    Env { var: String, message: String },

    #[error(transparent)]
    Invalid(#[from] todo_core::config::ConfigError),
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8000").
    pub bind_addr: String,
    /// Which repository implementation to build.
    pub storage: StorageBackend,
    /// PostgreSQL connection URL (only used by the postgres backend).
    pub database_url: String,
    /// Maximum number of pooled database connections.
    pub max_connections: u32,
    /// Deadline for a single request.
    pub request_timeout: Duration,
    /// Token and password settings.
    pub auth: AuthConfig,
}

/// One source of settings. Unset fields fall through to lower layers.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub bind_addr: Option<String>,
    pub storage: Option<StorageBackend>,
    pub database_url: Option<String>,
    pub max_connections: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub token_ttl_secs: Option<i64>,
    pub jwt_secret: Option<String>,
    pub password_salt: Option<String>,
}

impl ConfigLayer {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a YAML config file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Read settings from the process environment.
    ///
    /// | Variable               | Field                  |
    /// |------------------------|------------------------|
    /// | `BIND_ADDR`            | `bind_addr`            |
    /// | `STORAGE_BACKEND`      | `storage`              |
    /// | `DATABASE_URL`         | `database_url`         |
    /// | `DB_MAX_CONNECTIONS`   | `max_connections`      |
    /// | `REQUEST_TIMEOUT_SECS` | `request_timeout_secs` |
    /// | `TOKEN_TTL_SECS`       | `token_ttl_secs`       |
    /// | `JWT_SECRET` / `JWT_SIGN` | `jwt_secret`        |
    /// | `PASSWORD_SALT`        | `password_salt`        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a layer from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.is_empty());
        Ok(Self {
            bind_addr: get("BIND_ADDR"),
            storage: parse_var(&get, "STORAGE_BACKEND")?,
            database_url: get("DATABASE_URL"),
            max_connections: parse_var(&get, "DB_MAX_CONNECTIONS")?,
            request_timeout_secs: parse_var(&get, "REQUEST_TIMEOUT_SECS")?,
            token_ttl_secs: parse_var(&get, "TOKEN_TTL_SECS")?,
            jwt_secret: get("JWT_SECRET").or_else(|| get("JWT_SIGN")),
            password_salt: get("PASSWORD_SALT"),
        })
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn overlay(self, other: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            bind_addr: other.bind_addr.or(self.bind_addr),
            storage: other.storage.or(self.storage),
            database_url: other.database_url.or(self.database_url),
            max_connections: other.max_connections.or(self.max_connections),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            token_ttl_secs: other.token_ttl_secs.or(self.token_ttl_secs),
            jwt_secret: other.jwt_secret.or(self.jwt_secret),
            password_salt: other.password_salt.or(self.password_salt),
        }
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, var: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get(var)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| ConfigError::Env {
                var: var.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}

impl ApiConfig {
    /// Fill defaults for everything `layer` leaves unset and validate.
    ///
    /// A missing JWT secret or password salt is generated once and persisted
    /// under the user data dir.
    pub fn resolve(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let jwt_secret = match layer.jwt_secret {
            Some(secret) => secret,
            None => resolve_persisted_secret("jwt-secret")?,
        };
        let password_salt = match layer.password_salt {
            Some(salt) => salt,
            None => resolve_persisted_secret("password-salt")?,
        };
        let auth = AuthConfig::new(
            jwt_secret,
            chrono::Duration::seconds(layer.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS)),
            password_salt,
        );
        auth.validate()?;

        let request_timeout_secs = layer
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(todo_core::config::ConfigError::Invalid(
                "request timeout must be positive".into(),
            )
            .into());
        }

        Ok(Self {
            bind_addr: layer.bind_addr.unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            storage: layer.storage.unwrap_or_default(),
            database_url: layer
                .database_url
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            max_connections: layer.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
            request_timeout: Duration::from_secs(request_timeout_secs),
            auth,
        })
    }

    /// Defaults → optional YAML file → environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, ConfigLayer::default())
    }

    /// Like [`ApiConfig::load`], with `overrides` applied last.
    pub fn load_with(path: Option<&Path>, overrides: ConfigLayer) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => ConfigLayer::from_yaml_file(path)?,
            None => ConfigLayer::default(),
        };
        let layer = file.overlay(ConfigLayer::from_env()?).overlay(overrides);
        Self::resolve(layer)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn secrets() -> ConfigLayer {
        ConfigLayer {
            jwt_secret: Some("secret".into()),
            password_salt: Some("salt".into()),
            ..Default::default()
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = ApiConfig::resolve(secrets()).unwrap();
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(cfg.storage, StorageBackend::Memory);
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.auth.token_ttl.num_seconds(), DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn yaml_layer_parses() {
        let layer = ConfigLayer::from_yaml_str(
            "bind_addr: 0.0.0.0:9000\nstorage: postgres\ntoken_ttl_secs: 60\n",
        )
        .unwrap();
        assert_eq!(layer.bind_addr.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(layer.storage, Some(StorageBackend::Postgres));
        assert_eq!(layer.token_ttl_secs, Some(60));
    }

    #[test]
    fn yaml_rejects_unknown_keys() {
        assert!(matches!(
            ConfigLayer::from_yaml_str("bind: 1.2.3.4:1\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn yaml_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.yml");
        std::fs::write(&path, "max_connections: 9\n").unwrap();
        let layer = ConfigLayer::from_yaml_file(&path).unwrap();
        assert_eq!(layer.max_connections, Some(9));
        assert!(matches!(
            ConfigLayer::from_yaml_file(&dir.path().join("missing.yml")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn env_lookup_parses_values() {
        let layer = ConfigLayer::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "pg"),
            ("TOKEN_TTL_SECS", "120"),
            ("JWT_SIGN", "legacy-sign"),
            ("PASSWORD_SALT", ""),
        ]))
        .unwrap();
        assert_eq!(layer.storage, Some(StorageBackend::Postgres));
        assert_eq!(layer.token_ttl_secs, Some(120));
        assert_eq!(layer.jwt_secret.as_deref(), Some("legacy-sign"));
        assert_eq!(layer.password_salt, None);
    }

    #[test]
    fn jwt_secret_wins_over_jwt_sign() {
        let layer = ConfigLayer::from_lookup(lookup(&[
            ("JWT_SECRET", "new"),
            ("JWT_SIGN", "old"),
        ]))
        .unwrap();
        assert_eq!(layer.jwt_secret.as_deref(), Some("new"));
    }

    #[test]
    fn bad_env_number_is_reported() {
        let err = ConfigLayer::from_lookup(lookup(&[("TOKEN_TTL_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { ref var, .. } if var == "TOKEN_TTL_SECS"));
    }

    #[test]
    fn overlay_prefers_upper_layer() {
        let lower = ConfigLayer {
            bind_addr: Some("lower".into()),
            max_connections: Some(1),
            ..Default::default()
        };
        let upper = ConfigLayer {
            bind_addr: Some("upper".into()),
            ..Default::default()
        };
        let merged = lower.overlay(upper);
        assert_eq!(merged.bind_addr.as_deref(), Some("upper"));
        assert_eq!(merged.max_connections, Some(1));
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        let layer = ConfigLayer {
            token_ttl_secs: Some(0),
            ..secrets()
        };
        assert!(matches!(ApiConfig::resolve(layer), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let layer = ConfigLayer {
            request_timeout_secs: Some(0),
            ..secrets()
        };
        assert!(ApiConfig::resolve(layer).is_err());
    }
}
