//! Configuration loader for voxroute.
//!
//! Reads `config.toml` and deserializes it into [`GlobalConfig`], then applies
//! environment overrides. A missing file yields defaults; an unreadable or
//! malformed file is an error, since an explicit config that silently falls
//! back would route to the wrong agents.
//!
//! Environment overrides:
//! - `VOXROUTE_DATABASE_URL` -> `database.url`
//! - `VOXROUTE_HOST` -> `server.host`
//! - `VOXROUTE_PORT` -> `server.port`

use std::path::{Path, PathBuf};

use voxroute_types::config::GlobalConfig;
use voxroute_types::error::ConfigError;

/// Env var naming the config file when `--config` is not given.
pub const CONFIG_PATH_ENV: &str = "VOXROUTE_CONFIG";

/// Resolve which config file to read: explicit path, then `VOXROUTE_CONFIG`,
/// then `./config.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// Load configuration from `path` and apply environment overrides.
pub async fn load_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
    let mut config = read_config_file(path).await?;
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

async fn read_config_file(path: &Path) -> Result<GlobalConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(GlobalConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                reason: err.to_string(),
            });
        }
    };

    toml::from_str::<GlobalConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_overrides<F>(config: &mut GlobalConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("VOXROUTE_DATABASE_URL").filter(|v| !v.trim().is_empty()) {
        config.database.url = Some(url);
    }
    if let Some(host) = lookup("VOXROUTE_HOST").filter(|v| !v.trim().is_empty()) {
        config.server.host = host;
    }
    if let Some(port) = lookup("VOXROUTE_PORT") {
        config.server.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
            key: "VOXROUTE_PORT".to_string(),
            reason: format!("'{port}' is not a valid port"),
        })?;
    }
    Ok(())
}

/// The chat log database URL. Its absence is fatal at startup.
pub fn require_database_url(config: &GlobalConfig) -> Result<&str, ConfigError> {
    config
        .database
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ConfigError::Missing("database.url (or VOXROUTE_DATABASE_URL)".to_string()))
}
