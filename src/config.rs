use axum_extra::extract::cookie::Key;
use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error as ThisError;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/server.toml";
pub const ENV_PREFIX: &str = "WT_";
pub const MIN_SESSION_KEY_LEN: usize = 64;

/// Command line for the server binary.
#[derive(Debug, Parser)]
#[command(name = "winding-tree-server", about = "User registration and session API")]
pub struct Cli {
    /// Path to the TOML config file. Missing files fall back to defaults.
    #[arg(long, env = "WT_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_address: String,
    pub log_level: String,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Secret for the private session cookie; at least 64 bytes.
    pub session_key: Option<String>,
    pub session_max_age_days: i64,
    /// Drop the `Secure` flag so cookies work over plain HTTP (local dev).
    pub insecure_cookie: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            log_level: "debug".to_string(),
            database_url: "sqlite:winding-tree.sqlite".to_string(),
            database_max_connections: 5,
            session_key: None,
            session_max_age_days: 30,
            insecure_cookie: false,
        }
    }
}

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("session_key must be at least {MIN_SESSION_KEY_LEN} bytes, got {0}")]
    SessionKeyTooShort(usize),
}

impl Config {
    /// Defaults, then the TOML file at `path` (if present), then `WT_*` env vars.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
    }

    /// Key for the private cookie jar. Without a configured secret a random
    /// key is generated, so sessions do not survive a restart.
    pub fn session_key(&self) -> Result<Key, ConfigError> {
        match self.session_key.as_deref() {
            Some(secret) if secret.len() < MIN_SESSION_KEY_LEN => {
                Err(ConfigError::SessionKeyTooShort(secret.len()))
            }
            Some(secret) => Key::try_from(secret.as_bytes())
                .map_err(|_| ConfigError::SessionKeyTooShort(secret.len())),
            None => {
                warn!("no session_key configured; generating an ephemeral key");
                Ok(Key::generate())
            }
        }
    }

    pub fn session_max_age(&self) -> time::Duration {
        time::Duration::days(self.session_max_age_days)
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    let cli = Cli::parse();
    Config::load(&cli.config_path).expect("FATAL: failed to load configuration")
});
