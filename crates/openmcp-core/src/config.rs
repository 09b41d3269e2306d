//! Settings Loader
//!
//! Settings are layered, later sources winning:
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`, `OPENMCP_CONFIG`, or `openmcp.toml`)
//! 3. process environment variables, matched by lower-cased name
//!    (`DAILYHOT_API_URL` sets `dailyhot_api_url`)
//!
//! The environment layer has no prefix, so the whole process environment is
//! read. A bare `HOST` or `PORT` exported by a container platform therefore
//! moves the bind address; pass `--host`/`--port` to pin it.
//! `CORS_ORIGINS` is a comma-separated list.

use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::Result;

/// Config file used when neither `--config` nor `OPENMCP_CONFIG` is given
pub const DEFAULT_CONFIG_FILE: &str = "openmcp.toml";

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "OPENMCP_CONFIG";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DAILYHOT_API_URL: &str = "http://localhost:6688";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_MUSIC_API_URL: &str = "http://localhost:3300";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOGIN_SESSION_TTL_SECS: u64 = 300;
pub const DEFAULT_LOGIN_SESSION_CAPACITY: usize = 1024;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Facade bind host
    pub host: String,
    /// Facade bind port
    pub port: u16,
    /// Hot-list provider base URL
    pub dailyhot_api_url: String,
    /// Weather provider endpoint
    pub weather_api_url: String,
    /// Weather provider key
    #[serde(default)]
    pub weather_api_key: String,
    /// Music provider base URL
    pub music_api_url: String,
    pub upstream_timeout_secs: u64,
    pub login_session_ttl_secs: u64,
    pub login_session_capacity: usize,
    pub request_timeout_secs: u64,
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Load settings from defaults, the config file and the environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = resolve_config_path(config_path);
        debug!(path = %path.display(), "Resolved settings file");

        let settings: Settings = defaults()?
            .add_source(File::from(path.as_path()).required(false))
            .add_source(
                Environment::default()
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()?
            .try_deserialize()?;

        info!(
            bind = %settings.bind_addr(),
            dailyhot = %settings.dailyhot_api_url,
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Load settings from defaults and a config file only, ignoring the environment
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn login_session_ttl(&self) -> Duration {
        Duration::from_secs(self.login_session_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dailyhot_api_url: DEFAULT_DAILYHOT_API_URL.to_string(),
            weather_api_url: DEFAULT_WEATHER_API_URL.to_string(),
            weather_api_key: String::new(),
            music_api_url: DEFAULT_MUSIC_API_URL.to_string(),
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            login_session_ttl_secs: DEFAULT_LOGIN_SESSION_TTL_SECS,
            login_session_capacity: DEFAULT_LOGIN_SESSION_CAPACITY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cors_origins: Vec::new(),
        }
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
    let builder = Config::builder()
        .set_default("host", DEFAULT_HOST)?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("dailyhot_api_url", DEFAULT_DAILYHOT_API_URL)?
        .set_default("weather_api_url", DEFAULT_WEATHER_API_URL)?
        .set_default("weather_api_key", "")?
        .set_default("music_api_url", DEFAULT_MUSIC_API_URL)?
        .set_default("upstream_timeout_secs", DEFAULT_UPSTREAM_TIMEOUT_SECS)?
        .set_default("login_session_ttl_secs", DEFAULT_LOGIN_SESSION_TTL_SECS)?
        .set_default("login_session_capacity", DEFAULT_LOGIN_SESSION_CAPACITY as u64)?
        .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?;
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "port = 8002").unwrap();
        writeln!(file, "dailyhot_api_url = \"http://dailyhot:6688\"").unwrap();
        writeln!(file, "upstream_timeout_secs = 3").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.port, 8002);
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.dailyhot_api_url, "http://dailyhot:6688");
        assert_eq!(settings.upstream_timeout(), Duration::from_secs(3));
        assert_eq!(settings.login_session_capacity, DEFAULT_LOGIN_SESSION_CAPACITY);
        assert_eq!(settings.bind_addr(), "0.0.0.0:8002");
        assert!(settings.cors_origins.is_empty());
    }

    #[test]
    fn test_cors_origins_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "cors_origins = [\"http://dashboard.local\", \"https://ops.example.com\"]"
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(
            settings.cors_origins,
            vec!["http://dashboard.local", "https://ops.example.com"]
        );
    }

    #[test]
    fn test_default_matches_builtin_layer() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let loaded = Settings::from_file(file.path()).unwrap();
        let default = Settings::default();

        assert_eq!(loaded.port, default.port);
        assert_eq!(loaded.music_api_url, default.music_api_url);
        assert_eq!(loaded.weather_api_url, default.weather_api_url);
        assert_eq!(loaded.request_timeout(), default.request_timeout());
    }
}
