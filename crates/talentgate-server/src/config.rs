//! Gateway configuration.
//!
//! Configuration is layered: hardcoded defaults, then an optional YAML
//! file, then environment variables. Environment variables take
//! precedence, use the `TALENTGATE_` prefix, and `__` as the nested
//! key separator:
//!
//! - `TALENTGATE_SERVER__PORT=8080` overrides `server.port`
//! - `TALENTGATE_STORAGE__BUCKET=cv-drop` overrides `storage.bucket`
//! - `TALENTGATE_NOTIFICATIONS__TOPIC_ARN=...` overrides
//!   `notifications.topic_arn`

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct GatewayConfig {
    /// HTTP server settings (long-running server shape only).
    #[serde(default)]
    pub server: ServerSettings,

    /// External-service region.
    #[serde(default)]
    pub aws: AwsSettings,

    /// Object-storage settings.
    #[serde(default)]
    pub storage: StorageSettings,

    /// Role-table settings.
    #[serde(default)]
    pub roles: RoleTableSettings,

    /// Notification-topic settings.
    #[serde(default)]
    pub notifications: NotificationSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// HTTP server network settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Region the external services live in.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AwsSettings {
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            region: default_region(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Object-storage settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StorageSettings {
    /// Backend selection. Only "memory" ships with the gateway; the
    /// production stores are external collaborators reached through
    /// the backend traits.
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Bucket upload grants are scoped to.
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            bucket: default_bucket(),
        }
    }
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

fn default_bucket() -> String {
    "talentgate-uploads".to_string()
}

/// Role-table settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RoleTableSettings {
    /// Name of the key-value table holding job roles.
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for RoleTableSettings {
    fn default() -> Self {
        Self {
            table: default_table(),
        }
    }
}

fn default_table() -> String {
    "JobRoles".to_string()
}

/// Notification-topic settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NotificationSettings {
    /// Topic identifier subscriptions are addressed to.
    #[serde(default = "default_topic_arn")]
    pub topic_arn: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            topic_arn: default_topic_arn(),
        }
    }
}

fn default_topic_arn() -> String {
    "local:talentgate-role-updates".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development).
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl GatewayConfig {
    /// Loads configuration from a YAML file with environment variable
    /// overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&GatewayConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(
                Environment::with_prefix("TALENTGATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let gateway_config: GatewayConfig = config.try_deserialize()?;
        gateway_config.validate()?;

        Ok(gateway_config)
    }

    /// Loads configuration from environment variables only, on top of
    /// the defaults.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&GatewayConfig::default())?)
            .add_source(
                Environment::with_prefix("TALENTGATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let gateway_config: GatewayConfig = config.try_deserialize()?;
        gateway_config.validate()?;

        Ok(gateway_config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.server.port == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        let valid_backends = ["memory"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "storage.backend must be one of: {:?}, got: {}",
                    valid_backends, self.storage.backend
                ),
            });
        }

        if self.storage.bucket.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "storage.bucket must not be empty".to_string(),
            });
        }

        if self.notifications.topic_arn.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "notifications.topic_arn must not be empty".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.backend, "memory");
    }

    #[test]
    fn zero_port_is_rejected() {
        let config = GatewayConfig {
            server: ServerSettings {
                port: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::Invalid { .. })
        ));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let config = GatewayConfig {
            storage: StorageSettings {
                backend: "dynamo".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::Invalid { .. })
        ));
    }

    #[test]
    fn empty_topic_arn_is_rejected() {
        let config = GatewayConfig {
            notifications: NotificationSettings {
                topic_arn: "  ".to_string(),
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::Invalid { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            GatewayConfig::load("/does/not/exist.yaml"),
            Err(ConfigLoadError::FileNotFound { .. })
        ));
    }
}
