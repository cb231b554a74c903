use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Name of the durable key holding the bearer token. The token file lives
/// under `session.token_dir` with this file name.
pub const TOKEN_KEY: &str = "token_runify";

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub geo: GeoConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Runnify REST API.
    #[serde(default = "default_api_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted token file.
    #[serde(default = "default_token_dir")]
    pub token_dir: String,
    /// Static device position used when no geolocation hardware is
    /// available, as `[latitude, longitude]`.
    pub device_position: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Maximum number of files transferred at once during a multi-file
    /// upload.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoConfig {
    /// Base URL of the public country/subdivision/city directory.
    #[serde(default = "default_geo_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Minimum query length before the location search endpoint is
    /// consulted. Shorter queries resolve to an empty result without a
    /// network call.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub path: String,
    /// Maximum size of one log file in megabytes before rolling.
    #[serde(default = "default_log_size")]
    pub size: u64,
    #[serde(default = "default_log_max_files")]
    pub max_files: usize,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_token_dir() -> String {
    ".runnify".to_string()
}

fn default_max_concurrent() -> usize {
    4
}

fn default_geo_url() -> String {
    "https://countriesnow.space/api/v0.1".to_string()
}

fn default_min_query_len() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_size() -> u64 {
    10
}

fn default_log_max_files() -> usize {
    5
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_api_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            token_dir: default_token_dir(),
            device_position: None,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            max_concurrent: default_max_concurrent(),
        }
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        GeoConfig {
            base_url: default_geo_url(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            min_query_len: default_min_query_len(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            upload: UploadConfig::default(),
            geo: GeoConfig::default(),
            search: SearchConfig::default(),
            logging: None,
        }
    }
}

/// Load configuration from a TOML file. A missing file yields the default
/// configuration so the CLI works against a local API out of the box.
pub fn load_config(path: &str) -> Result<Config> {
    if !Path::new(path).exists() {
        return Ok(Config::default());
    }
    let config_text = fs::read_to_string(Path::new(path))?;
    let config: Config = toml::from_str(&config_text)?;
    Ok(config)
}
