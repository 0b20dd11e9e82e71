//! Configuration management for the tile game server.
//!
//! Handles loading configuration from a TOML file. Every key is optional;
//! command-line flags are applied on top by [`crate::cli::Cli`].

use crate::commands::DEFAULT_GRID_SIZE;
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Network session settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Game scaffolding settings.
    #[serde(default)]
    pub game: GameConfig,
}

/// Network session settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Maximum number of frames waiting for the command processor.
    #[serde(default = "default_inbound_capacity")]
    pub inbound_capacity: usize,

    /// Maximum number of results waiting to be written to one client.
    #[serde(default = "default_outbound_capacity")]
    pub outbound_capacity: usize,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_inbound_capacity() -> usize {
    1024
}

fn default_outbound_capacity() -> usize {
    64
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            inbound_capacity: default_inbound_capacity(),
            outbound_capacity: default_outbound_capacity(),
        }
    }
}

/// Game scaffolding settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    /// Number of tiles along each side of the grid.
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
}

fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tilegame")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ServerError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ServerError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.game.grid_size == 0 {
            return Err(ServerError::config("game.grid_size must be greater than zero"));
        }
        if self.server.inbound_capacity == 0 {
            return Err(ServerError::config(
                "server.inbound_capacity must be greater than zero",
            ));
        }
        if self.server.outbound_capacity == 0 {
            return Err(ServerError::config(
                "server.outbound_capacity must be greater than zero",
            ));
        }
        Ok(())
    }
}
