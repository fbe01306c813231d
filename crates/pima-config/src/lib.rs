//! Configuration loading for the Pima prediction client and service.
//! Reads pima.toml from the current directory or the path in the PIMA_CONFIG env var,
//! then applies environment overrides (API_URL, HOST, PORT, MODEL_PATH, METRICS_PATH).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "pima.toml";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid API URL {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// What the form handler does with a field whose text is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NanPolicy {
    /// Refuse to submit and tell the user which field is wrong.
    #[default]
    Reject,
    /// Send the request anyway; NaN goes out as JSON `null`.
    PassThrough,
}

impl NanPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NanPolicy::Reject      => "reject",
            NanPolicy::PassThrough => "pass_through",
        }
    }
}

impl fmt::Display for NanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NanPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "reject"                        => Ok(NanPolicy::Reject),
            "pass_through" | "pass-through" => Ok(NanPolicy::PassThrough),
            other => Err(ConfigError::InvalidValue {
                key: "nan_policy".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub nan_policy: NanPolicy,
    #[serde(default = "bool_true")]
    pub ignore_while_pending: bool,
}

fn default_api_url()      -> String { DEFAULT_API_URL.to_string() }
fn default_timeout_secs() -> u64    { 15 }
fn bool_true()            -> bool   { true }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            nan_policy: NanPolicy::default(),
            ignore_while_pending: bool_true(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Replace the API URL, normalising and validating it.
    pub fn set_api_url(&mut self, url: &str) -> Result<(), ConfigError> {
        self.api_url = normalize_api_url(url)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "default_metrics_path")]
    pub metrics_path: PathBuf,
}

fn default_host()         -> String  { "127.0.0.1".to_string() }
fn default_port()         -> u16     { 8000 }
fn default_model_path()   -> PathBuf { PathBuf::from("model/diabetes_model.json") }
fn default_metrics_path() -> PathBuf { PathBuf::from("metrics/metrics.json") }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_path: default_model_path(),
            metrics_path: default_metrics_path(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Strip trailing slashes and require an absolute http(s) URL.
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {other}"))),
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(trimmed.to_string())
}


impl Config {
    /// Load configuration: `.env`, then the file named by PIMA_CONFIG (or
    /// pima.toml), then process environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let path = std::env::var("PIMA_CONFIG").map(PathBuf::from).ok();
        Self::load_with_env(path.as_deref())
    }

    /// Load an explicit file (or the default file name) and apply process
    /// environment overrides.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::load_file(path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE)))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a config file without looking at the environment.
    ///
    /// A missing file is not an error; every key has a default.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document without touching the environment.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.client.api_url = normalize_api_url(&config.client.api_url)?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("API_URL").filter(|v| !v.trim().is_empty()) {
            self.client.set_api_url(&url)?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(path) = lookup("MODEL_PATH") {
            self.server.model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("METRICS_PATH") {
            self.server.metrics_path = PathBuf::from(path);
        }
        Ok(())
    }
}
