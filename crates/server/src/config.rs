//! Server configuration (C12): a `serde_json`-backed file with field-level
//! defaults, read from the single positional path the CLI accepts.

use std::path::Path;

use mp_core::protocol::{DEFAULT_PORT, MAX_PLAYERS, TICK_RATE};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_server_name() -> String {
    "Untitled Server".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_max_players() -> u32 {
    MAX_PLAYERS as u32
}
fn default_save_path() -> String {
    "world.json".to_string()
}
fn default_tick_rate() -> u32 {
    TICK_RATE
}
fn default_game_speed() -> f32 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(rename = "serverName")]
    pub server_name: String,
    pub port: u16,
    #[serde(rename = "maxPlayers")]
    pub max_players: u32,
    /// Reserved: the handshake record carries no password field, so this is
    /// parsed and stored but never checked (SPEC_FULL.md §9 open question 2).
    pub password: String,
    #[serde(rename = "savePath")]
    pub save_path: String,
    #[serde(rename = "tickRate")]
    pub tick_rate: u32,
    #[serde(rename = "pvpEnabled")]
    pub pvp_enabled: bool,
    #[serde(rename = "gameSpeed")]
    pub game_speed: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            server_name: default_server_name(),
            port: default_port(),
            max_players: default_max_players(),
            password: String::new(),
            save_path: default_save_path(),
            tick_rate: default_tick_rate(),
            pvp_enabled: true,
            game_speed: default_game_speed(),
        }
    }
}

impl ServerConfig {
    /// Loads from `path`; a missing file falls back to all-defaults with a
    /// logged warning rather than a startup error. A present-but-malformed
    /// file is a hard `ConfigError`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::warn!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(ConfigError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ServerConfig::load(Path::new("/nonexistent/path/server.json")).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.tick_rate, TICK_RATE);
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let dir = std::env::temp_dir().join(format!("mp-server-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("server.json");
        std::fs::write(&path, r#"{"port": 9999, "serverName": "Test Server"}"#).unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.port, 9999);
        assert_eq!(config.server_name, "Test Server");
        assert_eq!(config.max_players, MAX_PLAYERS as u32);
        assert_eq!(config.tick_rate, TICK_RATE);

        std::fs::remove_file(&path).unwrap();
        std::fs::remove_dir(&dir).unwrap();
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = std::env::temp_dir().join(format!("mp-server-test-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("server.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(ServerConfig::load(&path).is_err());

        std::fs::remove_file(&path).unwrap();
        std::fs::remove_dir(&dir).unwrap();
    }
}
