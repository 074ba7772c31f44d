//! # ra-config
//!
//! Process-wide settings, loaded once at startup into an immutable
//! [`AppConfig`] and handed to constructors.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. the TOML/JSON/YAML file named by `CONFIG_PATH` (required when set),
//!    otherwise `config/default.*` if present
//! 3. environment variables such as `RUSTY_ADS__SERVER__PORT=9000`

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "RUSTY_ADS";
pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";
const DEFAULT_CONFIG_FILE: &str = "config/default";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which `AdRepo` implementation the binary builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    /// Connection URL; may carry credentials, so it is never logged.
    #[serde(deserialize_with = "deserialize_secret")]
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl AppConfig {
    /// Loads `.env`, then layers defaults, the config file and the
    /// environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                debug!(%path, "loading config file");
                File::with_name(&path).required(true)
            }
            Err(_) => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = Self::defaults()?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::finish(builder)
    }

    /// Builder pre-populated with every default value.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.backend", "memory")?
            .set_default("database.url", "sqlite:rusty_ads.db")?
            .set_default("database.max_connections", 5)?
            .set_default("log.json", false)?)
    }

    /// Deserializes and validates whatever the builder has accumulated.
    pub fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}
