//! Configuration file management for studyplan.
//!
//! Provides a TOML-based config file at `~/.config/studyplan/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Bind address used when nothing else is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Port used when nothing else is configured.
pub const DEFAULT_PORT: u16 = 3001;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: ServerSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the studyplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/studyplan` or
/// `~/.config/studyplan`, on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("studyplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("studyplan")
}

/// Return the path to the studyplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved server configuration, ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl ServerConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Bind: `cli_bind` > `STUDYPLAN_BIND` env > `config_file.server.bind` > [`DEFAULT_BIND`]
    /// - Port: `cli_port` > `STUDYPLAN_PORT` env > `config_file.server.port` > [`DEFAULT_PORT`]
    pub fn resolve(cli_bind: Option<&str>, cli_port: Option<u16>) -> Result<Self> {
        let file_config = if config_path().exists() {
            match load_config() {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    tracing::warn!("ignoring config file: {e:#}");
                    None
                }
            }
        } else {
            None
        };

        let bind = if let Some(bind) = cli_bind {
            bind.to_string()
        } else if let Ok(bind) = std::env::var("STUDYPLAN_BIND") {
            bind
        } else if let Some(ref cfg) = file_config {
            cfg.server.bind.clone()
        } else {
            DEFAULT_BIND.to_string()
        };

        let port = if let Some(port) = cli_port {
            port
        } else if let Ok(raw) = std::env::var("STUDYPLAN_PORT") {
            raw.parse::<u16>()
                .with_context(|| format!("STUDYPLAN_PORT env var is not a valid port: {raw:?}"))?
        } else if let Some(ref cfg) = file_config {
            cfg.server.port
        } else {
            DEFAULT_PORT
        };

        Ok(Self { bind, port })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
